use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    #[default]
    Idle,
    Searching,
    Results,
    NoResults,
    Error,
}

impl PageState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Searching => "searching",
            Self::Results => "results",
            Self::NoResults => "no_results",
            Self::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageEvent {
    SearchSubmitted,
    ProductsFound,
    CatalogEmpty,
    RecommendationsLoaded,
    RequestFailed,
    PreferencesChanged,
    VariantSelected,
    RetryRequested,
}

/// Facts about the page the transition table needs but does not own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FlowContext {
    pub has_selected_product: bool,
    pub has_last_query: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: PageState,
    pub to: PageState,
    pub event: PageEvent,
}
