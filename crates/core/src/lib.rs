pub mod audit;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod flows;
pub mod page;
pub mod scoring;
pub mod selection;
pub mod service;
pub mod validation;

pub use audit::{AuditContext, AuditEvent, AuditSink, InMemoryAuditSink, NoopAuditSink};
pub use catalog::{Catalog, OfferBook, ResolvedProduct, RetailerDirectory};
pub use domain::offer::{DeliveryInfo, Offer, PriceBreakdown, ReviewSummary};
pub use domain::preferences::{PreferenceWeights, PresetType, SearchPreset, SEARCH_PRESETS};
pub use domain::product::{Product, ProductId, ProductVariant, SearchResult, VariantId};
pub use domain::recommendation::{
    Impact, Recommendation, RecommendationResult, RecommendationType, Score, Tradeoff,
    TradeoffCategory,
};
pub use domain::retailer::{Retailer, RetailerId};
pub use engine::ComparisonEngine;
pub use errors::{
    ApplicationError, DomainError, RecommendationError, SearchError, ValidationError,
};
pub use page::{spawn_page, Intent, PageController, PageHandle, PageView};
pub use service::{ComparisonService, MockComparisonService, RecommendationRequest};
