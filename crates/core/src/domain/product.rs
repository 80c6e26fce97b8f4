use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl VariantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A version of a product that differs in size, color, kit contents, etc.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantId,
    pub name: String,
    pub differentiators: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Price difference relative to the product's base price. Seed-only.
    #[serde(skip)]
    pub price_delta: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    /// List price the offer book prices retailers against. Seed-only.
    #[serde(skip)]
    pub base_price: Decimal,
}

impl Product {
    pub fn variant(&self, variant_id: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|variant| variant.id.as_str() == variant_id)
    }

    /// Text matched by catalog search: name, category and brand, lowercased.
    pub fn searchable_text(&self) -> String {
        format!("{} {} {}", self.name, self.category, self.brand).to_lowercase()
    }

    /// Base price adjusted for the variant, when one is given.
    pub fn price_for(&self, variant: Option<&ProductVariant>) -> Decimal {
        self.base_price + variant.map(|variant| variant.price_delta).unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub products: Vec<Product>,
    pub total_count: usize,
}

impl SearchResult {
    pub fn empty() -> Self {
        Self { products: Vec::new(), total_count: 0 }
    }

    pub fn from_products(products: Vec<Product>) -> Self {
        let total_count = products.len();
        Self { products, total_count }
    }

    pub fn first(&self) -> Option<&Product> {
        self.products.first()
    }
}
