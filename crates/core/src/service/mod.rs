use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::preferences::PreferenceWeights;
use crate::domain::product::{ProductId, ProductVariant, SearchResult};
use crate::domain::recommendation::RecommendationResult;
use crate::errors::{RecommendationError, SearchError};

pub mod mock;

pub use mock::MockComparisonService;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Product id or variant id.
    pub product_or_variant_id: String,
    pub weights: PreferenceWeights,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

impl RecommendationRequest {
    pub fn new(
        product_or_variant_id: impl Into<String>,
        weights: PreferenceWeights,
        zip_code: Option<String>,
    ) -> Self {
        Self { product_or_variant_id: product_or_variant_id.into(), weights, zip_code }
    }
}

/// Backend the search page talks to. Implementations must tolerate concurrent calls.
#[async_trait]
pub trait ComparisonService: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResult, SearchError>;

    async fn variants(&self, product_id: &ProductId) -> Result<Vec<ProductVariant>, SearchError>;

    /// An unknown id yields an empty recommendation list, not an error.
    async fn recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResult, RecommendationError>;
}
