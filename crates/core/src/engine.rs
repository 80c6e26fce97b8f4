use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::catalog::{Catalog, OfferBook, RetailerDirectory};
use crate::domain::preferences::PreferenceWeights;
use crate::domain::product::{ProductId, ProductVariant, SearchResult};
use crate::domain::recommendation::RecommendationResult;
use crate::errors::ValidationError;
use crate::selection::RecommendationSelector;

/// In-process comparison: catalog lookup, offer pricing, scoring and selection.
#[derive(Clone, Debug, Default)]
pub struct ComparisonEngine {
    catalog: Catalog,
    directory: RetailerDirectory,
    offers: OfferBook,
}

impl ComparisonEngine {
    pub fn new(catalog: Catalog, directory: RetailerDirectory, offers: OfferBook) -> Self {
        Self { catalog, directory, offers }
    }

    pub fn seeded() -> Self {
        Self::new(Catalog::seeded(), RetailerDirectory::seeded(), OfferBook::default())
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.offers = self.offers.with_currency(currency);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn search(&self, query: &str) -> SearchResult {
        let result = self.catalog.search(query);
        debug!(
            event_name = "comparison.search.completed",
            query = %query,
            total_count = result.total_count,
            "catalog search completed"
        );
        result
    }

    pub fn variants(&self, product_id: &ProductId) -> Vec<ProductVariant> {
        self.catalog.variants(product_id)
    }

    /// Unknown ids produce an empty result rather than an error.
    pub fn recommend(
        &self,
        product_or_variant_id: &str,
        weights: &PreferenceWeights,
        zip_code: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<RecommendationResult, ValidationError> {
        let selector = RecommendationSelector::new(weights)?;

        let (search_query, recommendations) = match self.catalog.resolve(product_or_variant_id) {
            Some(resolved) => {
                let offers = self.offers.offers_for(
                    &resolved.product,
                    resolved.variant.as_ref(),
                    zip_code,
                    now.date_naive(),
                );
                let picks = selector.select(&resolved, &offers, &self.directory);
                (resolved.product.name.clone(), picks)
            }
            None => {
                info!(
                    event_name = "comparison.recommendations.unknown_product",
                    product_id = %product_or_variant_id,
                    "no catalog entry for requested id"
                );
                (product_or_variant_id.to_owned(), Vec::new())
            }
        };

        info!(
            event_name = "comparison.recommendations.selected",
            product_id = %product_or_variant_id,
            recommendation_count = recommendations.len(),
            "recommendations selected"
        );

        Ok(RecommendationResult {
            recommendations,
            search_query,
            applied_preferences: *weights,
            timestamp: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::domain::preferences::{PreferenceWeights, PresetType};
    use crate::domain::recommendation::RecommendationType;
    use crate::engine::ComparisonEngine;
    use crate::errors::ValidationError;

    #[test]
    fn recommend_stamps_request_details_on_result() {
        let engine = ComparisonEngine::seeded();
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 15, 0, 0).single().expect("valid time");
        let weights = PresetType::FastestDelivery.weights();

        let result =
            engine.recommend("headphones-bose-700-silver", &weights, None, now).expect("recommend");

        assert_eq!(result.search_query, "Bose 700 Noise Cancelling Headphones");
        assert_eq!(result.applied_preferences, weights);
        assert_eq!(result.timestamp, now);
        let fastest = result.by_type(RecommendationType::FastestDelivery).expect("fastest pick");
        assert_eq!(
            fastest.variant.as_ref().map(|variant| variant.id.as_str()),
            Some("headphones-bose-700-silver")
        );
        assert!(fastest.price_breakdown.is_estimated);
    }

    #[test]
    fn unknown_id_yields_empty_recommendations() {
        let engine = ComparisonEngine::seeded();

        let result = engine
            .recommend("zzznonexistentproduct", &PreferenceWeights::EQUAL, Some("90210"), Utc::now())
            .expect("unknown id is not an error");

        assert!(result.recommendations.is_empty());
        assert_eq!(result.search_query, "zzznonexistentproduct");
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let engine = ComparisonEngine::seeded();

        let error = engine
            .recommend("tv-tcl-55", &PreferenceWeights::new(2.0, 0.0, 0.0, 0.0), None, Utc::now())
            .expect_err("weight above 1.0");

        assert!(matches!(error, ValidationError::WeightOutOfRange { axis: "value", .. }));
    }

    #[test]
    fn currency_flows_into_price_breakdowns() {
        let engine = ComparisonEngine::seeded().with_currency("EUR");

        let result = engine
            .recommend("drill-makita", &PreferenceWeights::EQUAL, Some("02139"), Utc::now())
            .expect("recommend");

        assert_eq!(result.recommendations.len(), 3);
        assert!(result
            .recommendations
            .iter()
            .all(|recommendation| recommendation.price_breakdown.currency == "EUR"));
    }
}
