use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{ProductId, VariantId};
use crate::domain::retailer::RetailerId;

/// Largest difference tolerated between `total_cost` and the sum of its components.
pub const TOTAL_COST_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    #[serde(with = "rust_decimal::serde::float")]
    pub item_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_cost: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub delivery_cost: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub installation_cost: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cost: Decimal,
    pub currency: String,
    pub is_estimated: bool,
}

impl PriceBreakdown {
    /// Builds a breakdown whose total is derived from its components.
    pub fn itemized(
        item_price: Decimal,
        shipping_cost: Decimal,
        installation_cost: Option<Decimal>,
        tax: Option<Decimal>,
        currency: impl Into<String>,
        is_estimated: bool,
    ) -> Self {
        let mut breakdown = Self {
            item_price,
            shipping_cost,
            delivery_cost: None,
            installation_cost,
            tax,
            total_cost: Decimal::ZERO,
            currency: currency.into(),
            is_estimated,
        };
        breakdown.total_cost = breakdown.component_total();
        breakdown
    }

    pub fn component_total(&self) -> Decimal {
        self.item_price
            + self.shipping_cost
            + self.delivery_cost.unwrap_or_default()
            + self.installation_cost.unwrap_or_default()
            + self.tax.unwrap_or_default()
    }

    /// True when `total_cost` equals the sum of the present components.
    pub fn is_consistent(&self) -> bool {
        (self.total_cost - self.component_total()).abs() <= TOTAL_COST_TOLERANCE
    }

    pub fn is_free_shipping(&self) -> bool {
        self.shipping_cost.is_zero() && self.delivery_cost.unwrap_or_default().is_zero()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfo {
    pub estimated_delivery_date: NaiveDate,
    /// e.g. "3-5 business days"
    pub delivery_window: String,
    #[serde(default)]
    pub min_days: u32,
    #[serde(default)]
    pub max_days: u32,
    pub shipping_method: String,
    pub is_free_shipping: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    /// 0.0 - 5.0
    pub rating: f64,
    pub review_count: u32,
    pub sentiment_themes: Vec<String>,
    pub verified_purchases: u32,
}

/// A retailer's priced, timed instance of a product. The unit that gets scored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub retailer_id: RetailerId,
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    pub price: PriceBreakdown,
    pub delivery: DeliveryInfo,
    pub reviews: ReviewSummary,
    pub purchase_url: String,
}
