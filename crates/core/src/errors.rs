use thiserror::Error;

use crate::flows::FlowTransitionError;

/// Input problems caught before anything reaches the backend. Never changes page state.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("please enter a product name")]
    EmptyQuery,
    #[error("please enter a valid 5-digit zip code (got `{0}`)")]
    InvalidZipCode(String),
    #[error("weight `{axis}` must be within 0.0..=1.0 (got {weight})")]
    WeightOutOfRange { axis: &'static str, weight: f64 },
    #[error("unknown preset `{0}` (expected best_value|fastest_delivery|most_trusted|custom)")]
    UnknownPreset(String),
    #[error("variant `{variant_id}` does not belong to product `{product_id}`")]
    UnknownVariant { product_id: String, variant_id: String },
    #[error("no product is selected")]
    NoSelectedProduct,
    #[error("a search is still loading; pick a variant once it finishes")]
    SearchInProgress,
    #[error("there is no previous search to retry")]
    NothingToRetry,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("search transport failure: {0}")]
    Transport(String),
    #[error("search failed with status {status}: {message}")]
    Server { status: u16, message: String },
    #[error("search response could not be decoded: {0}")]
    Decode(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecommendationError {
    #[error("recommendation transport failure: {0}")]
    Transport(String),
    #[error("recommendation request failed with status {status}: {message}")]
    Server { status: u16, message: String },
    #[error("recommendation response could not be decoded: {0}")]
    Decode(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    FlowTransition(#[from] FlowTransitionError),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Recommendation(#[from] RecommendationError),
    #[error("configuration failure: {0}")]
    Configuration(String),
    #[error("page runtime is no longer running")]
    RuntimeStopped,
}

pub const SEARCH_FAILED_MESSAGE: &str = "Failed to search products. Please try again.";
pub const RECOMMENDATIONS_FAILED_MESSAGE: &str =
    "Failed to fetch recommendations. Please try again.";

impl ApplicationError {
    /// Text safe to show the shopper. Validation errors keep their field message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(error) => capitalize(&error.to_string()),
            Self::Search(_) => SEARCH_FAILED_MESSAGE.to_string(),
            Self::Recommendation(_) => RECOMMENDATIONS_FAILED_MESSAGE.to_string(),
            Self::Domain(_) | Self::Configuration(_) | Self::RuntimeStopped => {
                "An unexpected error occurred.".to_string()
            }
        }
    }

    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain",
            Self::Validation(_) => "validation",
            Self::Search(_) => "search",
            Self::Recommendation(_) => "recommendation",
            Self::Configuration(_) => "config_validation",
            Self::RuntimeStopped => "runtime",
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{
        ApplicationError, DomainError, RecommendationError, SearchError, ValidationError,
        RECOMMENDATIONS_FAILED_MESSAGE, SEARCH_FAILED_MESSAGE,
    };

    #[test]
    fn validation_error_keeps_field_message() {
        let error = ApplicationError::from(ValidationError::EmptyQuery);

        assert_eq!(error.user_message(), "Please enter a product name");
        assert_eq!(error.error_class(), "validation");
    }

    #[test]
    fn transport_failures_map_to_generic_retry_messages() {
        let search = ApplicationError::from(SearchError::Transport("connection reset".to_owned()));
        let recommendation = ApplicationError::from(RecommendationError::Server {
            status: 502,
            message: "bad gateway".to_owned(),
        });

        assert_eq!(search.user_message(), SEARCH_FAILED_MESSAGE);
        assert_eq!(recommendation.user_message(), RECOMMENDATIONS_FAILED_MESSAGE);
        assert!(!recommendation.user_message().contains("502"));
    }

    #[test]
    fn domain_error_hides_internal_detail() {
        let error = ApplicationError::from(DomainError::from(
            crate::flows::FlowTransitionError::InvalidTransition {
                state: crate::flows::PageState::Results,
                event: crate::flows::PageEvent::RetryRequested,
            },
        ));

        assert_eq!(error.user_message(), "An unexpected error occurred.");
        assert_eq!(error.error_class(), "domain");
    }
}
