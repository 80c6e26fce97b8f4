use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::product::{ProductId, ProductVariant, SearchResult};
use crate::domain::recommendation::RecommendationResult;
use crate::engine::ComparisonEngine;
use crate::errors::{RecommendationError, SearchError};
use crate::service::{ComparisonService, RecommendationRequest};

/// Serves the seeded catalog in-process, optionally delaying every call.
#[derive(Clone, Debug, Default)]
pub struct MockComparisonService {
    engine: ComparisonEngine,
    latency: Option<Duration>,
}

impl MockComparisonService {
    pub fn new(engine: ComparisonEngine) -> Self {
        Self { engine, latency: None }
    }

    pub fn seeded() -> Self {
        Self::new(ComparisonEngine::seeded())
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = (!latency.is_zero()).then_some(latency);
        self
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ComparisonService for MockComparisonService {
    async fn search(&self, query: &str) -> Result<SearchResult, SearchError> {
        self.simulate_latency().await;
        Ok(self.engine.search(query))
    }

    async fn variants(&self, product_id: &ProductId) -> Result<Vec<ProductVariant>, SearchError> {
        self.simulate_latency().await;
        Ok(self.engine.variants(product_id))
    }

    async fn recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResult, RecommendationError> {
        self.simulate_latency().await;
        self.engine
            .recommend(
                &request.product_or_variant_id,
                &request.weights,
                request.zip_code.as_deref(),
                Utc::now(),
            )
            .map_err(|error| RecommendationError::Server { status: 400, message: error.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::domain::preferences::{PreferenceWeights, PresetType};
    use crate::domain::product::ProductId;
    use crate::errors::RecommendationError;
    use crate::service::{ComparisonService, MockComparisonService, RecommendationRequest};

    #[tokio::test]
    async fn search_then_recommend_for_first_match() {
        let service = MockComparisonService::seeded();

        let found = service.search("Samsung TV").await.expect("search");
        let product = found.first().expect("samsung tv is seeded");
        let result = service
            .recommendations(&RecommendationRequest::new(
                product.id.as_str(),
                PresetType::BestValue.weights(),
                Some("90210".to_owned()),
            ))
            .await
            .expect("recommendations");

        assert_eq!(product.id.as_str(), "tv-samsung-55");
        assert_eq!(result.recommendations.len(), 3);
    }

    #[tokio::test]
    async fn variants_come_from_catalog() {
        let service = MockComparisonService::seeded();

        let variants =
            service.variants(&ProductId("drill-milwaukee".to_owned())).await.expect("variants");

        assert_eq!(variants.len(), 2);
        assert_eq!(variants[1].id.as_str(), "drill-milwaukee-kit");
    }

    #[tokio::test]
    async fn invalid_weights_surface_as_client_error() {
        let service = MockComparisonService::seeded();

        let error = service
            .recommendations(&RecommendationRequest::new(
                "tv-sony-55",
                PreferenceWeights::new(0.5, 0.5, 0.5, 1.5),
                None,
            ))
            .await
            .expect_err("quality weight above 1.0");

        assert!(matches!(error, RecommendationError::Server { status: 400, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_simulated_with_tokio_time() {
        let service = MockComparisonService::seeded().with_latency(Duration::from_millis(800));
        let started = tokio::time::Instant::now();

        service.search("drill").await.expect("search");

        assert!(started.elapsed() >= Duration::from_millis(800));
    }
}
