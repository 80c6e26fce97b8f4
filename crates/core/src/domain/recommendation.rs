use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::offer::{DeliveryInfo, PriceBreakdown, ReviewSummary};
use crate::domain::preferences::PreferenceWeights;
use crate::domain::product::{Product, ProductVariant};
use crate::domain::retailer::Retailer;

/// One of the three slots the selector fills independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    BestValue,
    FastestDelivery,
    BestQuality,
}

impl RecommendationType {
    /// Slot fill order.
    pub const ALL: [Self; 3] = [Self::BestValue, Self::FastestDelivery, Self::BestQuality];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BestValue => "best_value",
            Self::FastestDelivery => "fastest_delivery",
            Self::BestQuality => "best_quality",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::BestValue => "Best Value",
            Self::FastestDelivery => "Fastest",
            Self::BestQuality => "Best Quality",
        }
    }

    pub(crate) fn id_suffix(&self) -> &'static str {
        match self {
            Self::BestValue => "value",
            Self::FastestDelivery => "fast",
            Self::BestQuality => "quality",
        }
    }
}

/// Integer sub-scores in 0..=100. `overall` combines value, speed, trust and quality;
/// `fit` is descriptive only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub value: u8,
    pub speed: u8,
    pub trust: u8,
    pub quality: u8,
    pub fit: u8,
    pub overall: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeoffCategory {
    Price,
    Speed,
    Trust,
    Quality,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tradeoff {
    pub category: TradeoffCategory,
    pub description: String,
    pub impact: Impact,
}

impl Tradeoff {
    pub fn new(category: TradeoffCategory, description: impl Into<String>, impact: Impact) -> Self {
        Self { category, description: description.into(), impact }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub product: Product,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<ProductVariant>,
    pub retailer: Retailer,
    pub price_breakdown: PriceBreakdown,
    pub delivery: DeliveryInfo,
    pub reviews: ReviewSummary,
    pub scores: Score,
    pub why_selected: String,
    pub tradeoffs: Vec<Tradeoff>,
    pub purchase_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub recommendations: Vec<Recommendation>,
    pub search_query: String,
    pub applied_preferences: PreferenceWeights,
    pub timestamp: DateTime<Utc>,
}

impl RecommendationResult {
    pub fn by_type(&self, kind: RecommendationType) -> Option<&Recommendation> {
        self.recommendations.iter().find(|recommendation| recommendation.kind == kind)
    }
}
