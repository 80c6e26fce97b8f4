use thiserror::Error;

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::flows::states::{FlowContext, PageEvent, PageState, TransitionOutcome};

/// idle -> searching -> results | no_results | error, with re-fetches from
/// results, searching and error.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlowEngine;

impl FlowEngine {
    pub fn initial_state(&self) -> PageState {
        PageState::Idle
    }

    pub fn apply(
        &self,
        current: &PageState,
        event: &PageEvent,
        context: &FlowContext,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        transition_search_page(current, event, context)
    }

    pub fn apply_with_audit<S>(
        &self,
        current: &PageState,
        event: &PageEvent,
        context: &FlowContext,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<TransitionOutcome, FlowTransitionError>
    where
        S: AuditSink + ?Sized,
    {
        let result = self.apply(current, event, context);
        match &result {
            Ok(outcome) => {
                sink.emit(
                    AuditEvent::new(
                        audit,
                        "flow.transition_applied",
                        AuditCategory::Flow,
                        AuditOutcome::Success,
                    )
                    .with_metadata("from", outcome.from.as_str())
                    .with_metadata("to", outcome.to.as_str())
                    .with_metadata("event", format!("{:?}", outcome.event)),
                );
            }
            Err(error) => {
                sink.emit(
                    AuditEvent::new(
                        audit,
                        "flow.transition_rejected",
                        AuditCategory::Flow,
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("error", error.to_string()),
                );
            }
        }
        result
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowTransitionError {
    #[error("missing required fields before transition from {state:?}: {missing_fields:?}")]
    MissingRequiredFields { state: PageState, missing_fields: Vec<String> },
    #[error("invalid transition from {state:?} using event {event:?}")]
    InvalidTransition { state: PageState, event: PageEvent },
}

fn transition_search_page(
    current: &PageState,
    event: &PageEvent,
    context: &FlowContext,
) -> Result<TransitionOutcome, FlowTransitionError> {
    use PageEvent::{
        CatalogEmpty, PreferencesChanged, ProductsFound, RecommendationsLoaded, RequestFailed,
        RetryRequested, SearchSubmitted, VariantSelected,
    };
    use PageState::{Error, NoResults, Results, Searching};

    let require = |present: bool, field: &str| {
        if present {
            Ok(())
        } else {
            Err(FlowTransitionError::MissingRequiredFields {
                state: *current,
                missing_fields: vec![field.to_owned()],
            })
        }
    };

    let to = match (current, event) {
        (_, SearchSubmitted) => Searching,
        (Searching, ProductsFound) => Searching,
        (Searching, CatalogEmpty) => NoResults,
        (Searching, RecommendationsLoaded) => Results,
        (Searching, RequestFailed) => Error,
        (Results | Searching | Error, PreferencesChanged | VariantSelected) => {
            require(context.has_selected_product, "selected_product")?;
            Searching
        }
        (Error, RetryRequested) => {
            require(context.has_last_query, "last_query")?;
            Searching
        }
        _ => {
            return Err(FlowTransitionError::InvalidTransition { state: *current, event: *event });
        }
    };

    Ok(TransitionOutcome { from: *current, to, event: *event })
}
