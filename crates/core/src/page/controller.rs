//! Owned state of the search page and the rules that change it.
//!
//! The controller never performs I/O. [`PageController::dispatch`] and
//! [`PageController::receive`] return the next [`Command`] to run, and the
//! caller feeds the backend's answer back as a [`Response`] carrying the same
//! [`RequestId`]. Only the answer to the most recently issued request is
//! applied; anything older is counted and dropped.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink, NoopAuditSink};
use crate::domain::preferences::{PreferenceWeights, PresetType};
use crate::domain::product::{Product, ProductVariant, SearchResult};
use crate::domain::recommendation::{Recommendation, RecommendationResult, RecommendationType};
use crate::errors::{
    ApplicationError, DomainError, RecommendationError, SearchError, ValidationError,
    RECOMMENDATIONS_FAILED_MESSAGE, SEARCH_FAILED_MESSAGE,
};
use crate::flows::{FlowContext, FlowEngine, PageEvent, PageState};
use crate::service::RecommendationRequest;
use crate::validation::{validate_query, validate_zip_code};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    Search { query: String, zip_code: Option<String> },
    /// `weights` is only read for [`PresetType::Custom`].
    ChangePreset { preset: PresetType, weights: Option<PreferenceWeights> },
    SelectVariant(String),
    Retry,
}

/// Backend work the controller wants done.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Search { request_id: RequestId, query: String },
    Recommend { request_id: RequestId, request: RecommendationRequest },
}

impl Command {
    pub fn request_id(&self) -> RequestId {
        match self {
            Self::Search { request_id, .. } | Self::Recommend { request_id, .. } => *request_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    Search { request_id: RequestId, result: Result<SearchResult, SearchError> },
    Recommendations {
        request_id: RequestId,
        result: Result<RecommendationResult, RecommendationError>,
    },
}

impl Response {
    pub fn request_id(&self) -> RequestId {
        match self {
            Self::Search { request_id, .. } | Self::Recommendations { request_id, .. } => {
                *request_id
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Search { .. } => "search",
            Self::Recommendations { .. } => "recommendations",
        }
    }
}

/// Everything the presentation layer renders.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageView {
    pub state: PageState,
    pub query: String,
    pub zip_code: Option<String>,
    pub error_message: Option<String>,
    pub selected_product: Option<Product>,
    pub variants: Vec<ProductVariant>,
    pub selected_variant_id: Option<String>,
    pub selected_preset: PresetType,
    pub custom_weights: Option<PreferenceWeights>,
    pub recommendations: Vec<Recommendation>,
    pub pending_request: Option<RequestId>,
    pub discarded_responses: u64,
}

impl Default for PageView {
    fn default() -> Self {
        Self::with_preset(PresetType::default())
    }
}

impl PageView {
    pub fn with_preset(selected_preset: PresetType) -> Self {
        Self {
            state: PageState::Idle,
            query: String::new(),
            zip_code: None,
            error_message: None,
            selected_product: None,
            variants: Vec::new(),
            selected_variant_id: None,
            selected_preset,
            custom_weights: None,
            recommendations: Vec::new(),
            pending_request: None,
            discarded_responses: 0,
        }
    }

    /// Custom weights when set, otherwise the preset's.
    pub fn weights(&self) -> PreferenceWeights {
        self.custom_weights.unwrap_or_else(|| self.selected_preset.weights())
    }

    pub fn recommendation(&self, kind: RecommendationType) -> Option<&Recommendation> {
        self.recommendations.iter().find(|recommendation| recommendation.kind == kind)
    }

    pub fn is_loading(&self) -> bool {
        self.pending_request.is_some()
    }
}

/// What the in-flight request will answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PendingKind {
    Search,
    Recommendations,
}

pub struct PageController {
    flow: FlowEngine,
    view: PageView,
    pending: Option<PendingKind>,
    last_issued: u64,
    audit: Arc<dyn AuditSink>,
    session_id: Option<String>,
}

impl fmt::Debug for PageController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageController")
            .field("view", &self.view)
            .field("pending", &self.pending)
            .field("last_issued", &self.last_issued)
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

impl Default for PageController {
    fn default() -> Self {
        Self::new(PresetType::default())
    }
}

impl PageController {
    pub fn new(default_preset: PresetType) -> Self {
        Self {
            flow: FlowEngine::default(),
            view: PageView::with_preset(default_preset),
            pending: None,
            last_issued: 0,
            audit: Arc::new(NoopAuditSink),
            session_id: None,
        }
    }

    pub fn with_audit(mut self, sink: Arc<dyn AuditSink>, session_id: Option<String>) -> Self {
        self.audit = sink;
        self.session_id = session_id;
        self
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    /// Applies a shopper intent. Errors leave the page untouched.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Option<Command>, ApplicationError> {
        match intent {
            Intent::Search { query, zip_code } => self.search(&query, zip_code.as_deref()),
            Intent::ChangePreset { preset, weights } => self.change_preset(preset, weights),
            Intent::SelectVariant(variant_id) => self.select_variant(variant_id),
            Intent::Retry => self.retry(),
        }
    }

    /// Applies a backend answer if it belongs to the latest request.
    pub fn receive(&mut self, response: Response) -> Option<Command> {
        let request_id = response.request_id();
        if self.view.pending_request != Some(request_id) {
            self.view.discarded_responses += 1;
            info!(
                event_name = "page.response.discarded",
                correlation_id = %request_id,
                latest_request = self.last_issued,
                response_kind = response.kind(),
                "stale response discarded"
            );
            self.audit.emit(
                AuditEvent::new(
                    &self.audit_context(request_id),
                    "page.response_discarded",
                    AuditCategory::Backend,
                    AuditOutcome::Discarded,
                )
                .with_metadata("response_kind", response.kind()),
            );
            return None;
        }

        match response {
            Response::Search { request_id, result: Ok(result) } => {
                self.apply_search_result(request_id, result)
            }
            Response::Search { request_id, result: Err(error) } => {
                warn!(
                    event_name = "page.search.failed",
                    correlation_id = %request_id,
                    error = %error,
                    "search request failed"
                );
                self.fail(request_id, SEARCH_FAILED_MESSAGE);
                self.clear_selection();
                None
            }
            Response::Recommendations { request_id, result: Ok(result) } => {
                if self.transition(request_id, PageEvent::RecommendationsLoaded).is_ok() {
                    debug!(
                        event_name = "page.recommendations.applied",
                        correlation_id = %request_id,
                        recommendation_count = result.recommendations.len(),
                        "recommendations applied"
                    );
                    self.view.recommendations = result.recommendations;
                }
                self.finish_request();
                None
            }
            Response::Recommendations { request_id, result: Err(error) } => {
                warn!(
                    event_name = "page.recommendations.failed",
                    correlation_id = %request_id,
                    error = %error,
                    "recommendation request failed"
                );
                self.fail(request_id, RECOMMENDATIONS_FAILED_MESSAGE);
                None
            }
        }
    }

    fn search(
        &mut self,
        query: &str,
        zip_code: Option<&str>,
    ) -> Result<Option<Command>, ApplicationError> {
        let query = validate_query(query)?;
        let zip_code = validate_zip_code(zip_code)?;

        let request_id = self.next_request_id();
        self.transition(request_id, PageEvent::SearchSubmitted)?;

        self.view.query = query.clone();
        self.view.zip_code = zip_code;
        self.view.error_message = None;
        self.view.recommendations.clear();
        self.begin_request(request_id, PendingKind::Search);

        info!(
            event_name = "page.search.submitted",
            correlation_id = %request_id,
            query = %query,
            "search submitted"
        );
        Ok(Some(Command::Search { request_id, query }))
    }

    fn change_preset(
        &mut self,
        preset: PresetType,
        weights: Option<PreferenceWeights>,
    ) -> Result<Option<Command>, ApplicationError> {
        let custom_weights = match preset {
            PresetType::Custom => {
                let weights = weights.unwrap_or(PreferenceWeights::EQUAL);
                weights.validate()?;
                Some(weights)
            }
            _ => None,
        };

        // The follow-up recommendation request of a pending search reads these.
        if self.view.selected_product.is_none() || self.search_pending() {
            self.view.selected_preset = preset;
            self.view.custom_weights = custom_weights;
            debug!(
                event_name = "page.preferences.stored",
                preset = preset.as_str(),
                search_pending = self.search_pending(),
                "preferences stored without refetch"
            );
            return Ok(None);
        }

        let request_id = self.next_request_id();
        self.transition(request_id, PageEvent::PreferencesChanged)?;
        self.view.selected_preset = preset;
        self.view.custom_weights = custom_weights;

        let target = self.recommendation_target();
        Ok(Some(self.recommend(request_id, target)))
    }

    fn select_variant(&mut self, variant_id: String) -> Result<Option<Command>, ApplicationError> {
        if self.search_pending() {
            return Err(ValidationError::SearchInProgress.into());
        }
        let Some(product) = self.view.selected_product.as_ref() else {
            return Err(ValidationError::NoSelectedProduct.into());
        };
        let belongs = product.id.as_str() == variant_id || product.variant(&variant_id).is_some();
        if !belongs {
            return Err(ValidationError::UnknownVariant {
                product_id: product.id.to_string(),
                variant_id,
            }
            .into());
        }

        let request_id = self.next_request_id();
        self.transition(request_id, PageEvent::VariantSelected)?;
        self.view.selected_variant_id = Some(variant_id.clone());
        Ok(Some(self.recommend(request_id, variant_id)))
    }

    fn retry(&mut self) -> Result<Option<Command>, ApplicationError> {
        if self.view.query.is_empty() {
            return Err(ValidationError::NothingToRetry.into());
        }

        let request_id = self.next_request_id();
        self.transition(request_id, PageEvent::RetryRequested)?;

        let query = self.view.query.clone();
        self.view.error_message = None;
        self.view.recommendations.clear();
        self.begin_request(request_id, PendingKind::Search);
        info!(
            event_name = "page.search.retried",
            correlation_id = %request_id,
            query = %query,
            "search retried"
        );
        Ok(Some(Command::Search { request_id, query }))
    }

    fn apply_search_result(&mut self, request_id: RequestId, result: SearchResult) -> Option<Command> {
        let Some(product) = result.products.into_iter().next() else {
            if self.transition(request_id, PageEvent::CatalogEmpty).is_ok() {
                self.clear_selection();
            }
            self.finish_request();
            return None;
        };

        if self.transition(request_id, PageEvent::ProductsFound).is_err() {
            self.finish_request();
            return None;
        }

        let next_request = self.next_request_id();
        let target = product.id.to_string();
        self.view.variants = product.variants.clone();
        self.view.selected_variant_id = Some(target.clone());
        self.view.selected_product = Some(product);
        Some(self.recommend(next_request, target))
    }

    fn recommend(&mut self, request_id: RequestId, target: String) -> Command {
        self.begin_request(request_id, PendingKind::Recommendations);
        info!(
            event_name = "page.recommendations.requested",
            correlation_id = %request_id,
            product_id = %target,
            preset = self.view.selected_preset.as_str(),
            "recommendations requested"
        );
        Command::Recommend {
            request_id,
            request: RecommendationRequest::new(
                target,
                self.view.weights(),
                self.view.zip_code.clone(),
            ),
        }
    }

    fn fail(&mut self, request_id: RequestId, message: &str) {
        if self.transition(request_id, PageEvent::RequestFailed).is_ok() {
            self.view.error_message = Some(message.to_owned());
        }
        self.finish_request();
    }

    fn begin_request(&mut self, request_id: RequestId, kind: PendingKind) {
        self.view.pending_request = Some(request_id);
        self.pending = Some(kind);
    }

    fn finish_request(&mut self) {
        self.view.pending_request = None;
        self.pending = None;
    }

    fn search_pending(&self) -> bool {
        self.pending == Some(PendingKind::Search)
    }

    fn clear_selection(&mut self) {
        self.view.selected_product = None;
        self.view.variants.clear();
        self.view.selected_variant_id = None;
    }

    /// Selected variant when there is one, otherwise the selected product.
    fn recommendation_target(&self) -> String {
        self.view
            .selected_variant_id
            .clone()
            .or_else(|| self.view.selected_product.as_ref().map(|product| product.id.to_string()))
            .unwrap_or_default()
    }

    fn next_request_id(&mut self) -> RequestId {
        self.last_issued += 1;
        RequestId(self.last_issued)
    }

    fn transition(&mut self, request_id: RequestId, event: PageEvent) -> Result<(), DomainError> {
        let context = FlowContext {
            has_selected_product: self.view.selected_product.is_some(),
            has_last_query: !self.view.query.is_empty(),
        };
        let outcome = self.flow.apply_with_audit(
            &self.view.state,
            &event,
            &context,
            self.audit.as_ref(),
            &self.audit_context(request_id),
        )?;
        debug!(
            event_name = "page.transition.applied",
            correlation_id = %request_id,
            from = outcome.from.as_str(),
            to = outcome.to.as_str(),
            "page transition applied"
        );
        self.view.state = outcome.to;
        Ok(())
    }

    fn audit_context(&self, request_id: RequestId) -> AuditContext {
        AuditContext::new(self.session_id.clone(), request_id.to_string(), "page-controller")
    }
}
