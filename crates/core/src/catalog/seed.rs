//! Static reference data the in-process comparison engine is built from.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::domain::product::{Product, ProductId, ProductVariant, VariantId};
use crate::domain::retailer::{Retailer, RetailerId};

#[derive(Debug, Clone, Copy)]
struct VariantSeed {
    id: &'static str,
    name: &'static str,
    differentiator: (&'static str, &'static str),
    price_delta_cents: i64,
}

#[derive(Debug, Clone, Copy)]
struct ProductSeed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: &'static str,
    brand: &'static str,
    image_url: &'static str,
    base_price_cents: i64,
    variants: &'static [VariantSeed],
}

const TV_IMAGE: &str = "https://images.unsplash.com/photo-1593359677879-a4bb92f829d1?w=400";
const HEADPHONES_IMAGE: &str = "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=400";
const DRILL_IMAGE: &str = "https://images.unsplash.com/photo-1504148455328-c376907d081c?w=400";

const fn variant(
    id: &'static str,
    name: &'static str,
    differentiator: (&'static str, &'static str),
    price_delta_cents: i64,
) -> VariantSeed {
    VariantSeed { id, name, differentiator, price_delta_cents }
}

const PRODUCT_SEEDS: &[ProductSeed] = &[
    ProductSeed {
        id: "tv-samsung-55",
        name: "Samsung 55\" 4K Smart TV",
        description: "Crystal UHD display with HDR support and built-in streaming apps",
        category: "Electronics",
        brand: "Samsung",
        image_url: TV_IMAGE,
        base_price_cents: 47_999,
        variants: &[
            variant("tv-samsung-50", "50\" Model", ("size", "50 inch"), -8_000),
            variant("tv-samsung-55", "55\" Model", ("size", "55 inch"), 0),
            variant("tv-samsung-65", "65\" Model", ("size", "65 inch"), 22_000),
        ],
    },
    ProductSeed {
        id: "tv-lg-55",
        name: "LG 55\" OLED 4K Smart TV",
        description: "Self-lit OLED pixels with infinite contrast and Dolby Vision IQ",
        category: "Electronics",
        brand: "LG",
        image_url: TV_IMAGE,
        base_price_cents: 129_999,
        variants: &[
            variant("tv-lg-48", "48\" Model", ("size", "48 inch"), -20_000),
            variant("tv-lg-55", "55\" Model", ("size", "55 inch"), 0),
            variant("tv-lg-65", "65\" Model", ("size", "65 inch"), 50_000),
            variant("tv-lg-77", "77\" Model", ("size", "77 inch"), 140_000),
        ],
    },
    ProductSeed {
        id: "tv-sony-55",
        name: "Sony Bravia 55\" 4K LED TV",
        description: "Cognitive Processor XR with Triluminos Pro and Google TV built-in",
        category: "Electronics",
        brand: "Sony",
        image_url: TV_IMAGE,
        base_price_cents: 89_999,
        variants: &[
            variant("tv-sony-50", "50\" Model", ("size", "50 inch"), -10_000),
            variant("tv-sony-55", "55\" Model", ("size", "55 inch"), 0),
            variant("tv-sony-65", "65\" Model", ("size", "65 inch"), 30_000),
            variant("tv-sony-75", "75\" Model", ("size", "75 inch"), 80_000),
        ],
    },
    ProductSeed {
        id: "tv-tcl-55",
        name: "TCL 55\" 4K Roku Smart TV",
        description: "Affordable 4K with built-in Roku streaming and voice control",
        category: "Electronics",
        brand: "TCL",
        image_url: TV_IMAGE,
        base_price_cents: 29_999,
        variants: &[
            variant("tv-tcl-43", "43\" Model", ("size", "43 inch"), -10_000),
            variant("tv-tcl-50", "50\" Model", ("size", "50 inch"), -5_000),
            variant("tv-tcl-55", "55\" Model", ("size", "55 inch"), 0),
            variant("tv-tcl-65", "65\" Model", ("size", "65 inch"), 15_000),
        ],
    },
    ProductSeed {
        id: "headphones-sony",
        name: "Sony WH-1000XM5 Headphones",
        description: "Industry-leading noise cancellation with exceptional sound quality",
        category: "Electronics",
        brand: "Sony",
        image_url: HEADPHONES_IMAGE,
        base_price_cents: 39_999,
        variants: &[
            variant("headphones-sony-black", "Black", ("color", "Black"), 0),
            variant("headphones-sony-silver", "Silver", ("color", "Silver"), 0),
        ],
    },
    ProductSeed {
        id: "headphones-bose-700",
        name: "Bose 700 Noise Cancelling Headphones",
        description: "Premium noise cancellation with 11 levels of adjustment and crystal-clear calls",
        category: "Electronics",
        brand: "Bose",
        image_url: HEADPHONES_IMAGE,
        base_price_cents: 37_900,
        variants: &[
            variant("headphones-bose-700-black", "Black", ("color", "Black"), 0),
            variant("headphones-bose-700-silver", "Silver Luxe", ("color", "Silver"), 2_000),
            variant("headphones-bose-700-white", "Soapstone", ("color", "White"), 0),
        ],
    },
    ProductSeed {
        id: "headphones-jbl-live",
        name: "JBL Live 660NC Wireless Headphones",
        description: "Adaptive noise cancelling with JBL Signature Sound and 50-hour battery",
        category: "Electronics",
        brand: "JBL",
        image_url: HEADPHONES_IMAGE,
        base_price_cents: 19_995,
        variants: &[
            variant("headphones-jbl-live-black", "Black", ("color", "Black"), 0),
            variant("headphones-jbl-live-blue", "Blue", ("color", "Blue"), 0),
            variant("headphones-jbl-live-white", "White", ("color", "White"), 0),
        ],
    },
    ProductSeed {
        id: "drill-dewalt",
        name: "DeWalt 20V MAX Cordless Drill",
        description: "Powerful cordless drill with 2-speed transmission and LED light",
        category: "Tools",
        brand: "DeWalt",
        image_url: DRILL_IMAGE,
        base_price_cents: 9_900,
        variants: &[
            variant("drill-dewalt-basic", "Basic Kit", ("kit", "Drill only"), 0),
            variant("drill-dewalt-combo", "Combo Kit", ("kit", "Drill + Impact Driver"), 6_000),
        ],
    },
    ProductSeed {
        id: "drill-milwaukee",
        name: "Milwaukee M18 FUEL Hammer Drill",
        description: "Brushless motor with POWERSTATE technology for maximum performance",
        category: "Tools",
        brand: "Milwaukee",
        image_url: DRILL_IMAGE,
        base_price_cents: 22_900,
        variants: &[
            variant("drill-milwaukee-tool", "Tool Only", ("kit", "Drill only"), 0),
            variant(
                "drill-milwaukee-kit",
                "Kit with Batteries",
                ("kit", "Drill + 2 Batteries + Charger"),
                17_000,
            ),
        ],
    },
    ProductSeed {
        id: "drill-makita",
        name: "Makita 18V LXT Cordless Drill",
        description: "Compact and lightweight with variable speed and built-in LED",
        category: "Tools",
        brand: "Makita",
        image_url: DRILL_IMAGE,
        base_price_cents: 8_900,
        variants: &[
            variant("drill-makita-basic", "Bare Tool", ("kit", "Drill only"), 0),
            variant(
                "drill-makita-combo",
                "Combo Kit",
                ("kit", "Drill + Impact Driver + Batteries"),
                11_000,
            ),
        ],
    },
    ProductSeed {
        id: "vacuum-dyson-v15",
        name: "Dyson V15 Detect Cordless Vacuum",
        description: "Laser reveals microscopic dust with piezo sensor for real-time particle counts",
        category: "Appliances",
        brand: "Dyson",
        image_url: "https://images.unsplash.com/photo-1558317374-067fb5f30001?w=400",
        base_price_cents: 74_999,
        variants: &[
            variant("vacuum-dyson-v15-absolute", "Absolute", ("model", "Full accessories"), 0),
            variant("vacuum-dyson-v15-complete", "Complete", ("model", "Extra attachments"), 5_000),
        ],
    },
    ProductSeed {
        id: "mixer-kitchenaid",
        name: "KitchenAid Artisan Stand Mixer",
        description: "5-quart tilt-head stand mixer with 10 speeds and planetary mixing action",
        category: "Appliances",
        brand: "KitchenAid",
        image_url: "https://images.unsplash.com/photo-1594385208974-2e75f8d7bb48?w=400",
        base_price_cents: 44_999,
        variants: &[
            variant("mixer-kitchenaid-red", "Empire Red", ("color", "Red"), 0),
            variant("mixer-kitchenaid-silver", "Contour Silver", ("color", "Silver"), 0),
            variant("mixer-kitchenaid-black", "Onyx Black", ("color", "Black"), 0),
            variant("mixer-kitchenaid-blue", "Blue Velvet", ("color", "Blue"), 0),
        ],
    },
];

#[derive(Debug, Clone, Copy)]
struct RetailerSeed {
    id: &'static str,
    name: &'static str,
    domain: &'static str,
    trust_score: u8,
    return_policy: &'static str,
    warranty_info: &'static str,
}

const RETAILER_SEEDS: &[RetailerSeed] = &[
    RetailerSeed {
        id: "amazon",
        name: "Amazon",
        domain: "amazon.com",
        trust_score: 85,
        return_policy: "30-day free returns",
        warranty_info: "Manufacturer warranty included",
    },
    RetailerSeed {
        id: "walmart",
        name: "Walmart",
        domain: "walmart.com",
        trust_score: 82,
        return_policy: "90-day returns in-store or by mail",
        warranty_info: "Extended warranty available",
    },
    RetailerSeed {
        id: "bestbuy",
        name: "Best Buy",
        domain: "bestbuy.com",
        trust_score: 88,
        return_policy: "15-day return policy (45 for members)",
        warranty_info: "Geek Squad Protection available",
    },
    RetailerSeed {
        id: "homedepot",
        name: "Home Depot",
        domain: "homedepot.com",
        trust_score: 86,
        return_policy: "90-day return policy for most items",
        warranty_info: "Protection plans available",
    },
];

/// How a retailer prices, ships and is reviewed. Drives the offer book.
#[derive(Debug, Clone, Copy)]
pub struct RetailerProfile {
    pub retailer_id: &'static str,
    pub storefront: &'static str,
    /// Multiplier on the list price, in basis points.
    pub price_multiplier_bp: i64,
    pub shipping_cents: i64,
    pub free_shipping_categories: &'static [&'static str],
    /// Sales tax on the item price, in basis points.
    pub tax_rate_bp: i64,
    pub min_days: u32,
    pub max_days: u32,
    pub shipping_method: &'static str,
    /// Fee charged for products whose id starts with one of `installable_prefixes`.
    pub installation_cents: Option<i64>,
    pub installable_prefixes: &'static [&'static str],
    pub categories: &'static [&'static str],
    pub rating: f64,
    pub review_count: u32,
    pub verified_purchases: u32,
    pub sentiment_themes: &'static [&'static str],
}

pub const RETAILER_PROFILES: &[RetailerProfile] = &[
    RetailerProfile {
        retailer_id: "amazon",
        storefront: "https://www.amazon.com",
        price_multiplier_bp: 10_000,
        shipping_cents: 0,
        free_shipping_categories: &[],
        tax_rate_bp: 800,
        min_days: 1,
        max_days: 2,
        shipping_method: "Prime Free Same-Day",
        installation_cents: None,
        installable_prefixes: &[],
        categories: &["Electronics", "Tools", "Appliances"],
        rating: 4.5,
        review_count: 12_543,
        verified_purchases: 10_234,
        sentiment_themes: &["fast shipping", "quality product", "as described"],
    },
    RetailerProfile {
        retailer_id: "walmart",
        storefront: "https://www.walmart.com",
        price_multiplier_bp: 9_400,
        shipping_cents: 0,
        free_shipping_categories: &[],
        tax_rate_bp: 800,
        min_days: 4,
        max_days: 6,
        shipping_method: "Standard Shipping",
        installation_cents: None,
        installable_prefixes: &[],
        categories: &["Electronics", "Tools", "Appliances"],
        rating: 4.3,
        review_count: 2_847,
        verified_purchases: 2_156,
        sentiment_themes: &["good value", "reliable", "easy setup"],
    },
    RetailerProfile {
        retailer_id: "bestbuy",
        storefront: "https://www.bestbuy.com",
        price_multiplier_bp: 9_800,
        shipping_cents: 0,
        free_shipping_categories: &[],
        tax_rate_bp: 800,
        min_days: 2,
        max_days: 4,
        shipping_method: "Free Standard Shipping",
        installation_cents: Some(4_999),
        installable_prefixes: &["tv-"],
        categories: &["Electronics", "Appliances"],
        rating: 4.7,
        review_count: 5_621,
        verified_purchases: 4_892,
        sentiment_themes: &["excellent service", "expert installation", "premium experience"],
    },
    RetailerProfile {
        retailer_id: "homedepot",
        storefront: "https://www.homedepot.com",
        price_multiplier_bp: 9_700,
        shipping_cents: 599,
        free_shipping_categories: &["Tools"],
        tax_rate_bp: 800,
        min_days: 3,
        max_days: 5,
        shipping_method: "Standard Delivery",
        installation_cents: None,
        installable_prefixes: &[],
        categories: &["Tools", "Appliances"],
        rating: 4.4,
        review_count: 3_180,
        verified_purchases: 2_470,
        sentiment_themes: &["sturdy packaging", "knowledgeable staff", "easy returns"],
    },
];

pub fn seed_products() -> Vec<Product> {
    PRODUCT_SEEDS
        .iter()
        .map(|seed| Product {
            id: ProductId(seed.id.to_owned()),
            name: seed.name.to_owned(),
            description: seed.description.to_owned(),
            category: seed.category.to_owned(),
            brand: seed.brand.to_owned(),
            image_url: Some(seed.image_url.to_owned()),
            variants: seed
                .variants
                .iter()
                .map(|variant| ProductVariant {
                    id: VariantId(variant.id.to_owned()),
                    name: variant.name.to_owned(),
                    differentiators: BTreeMap::from([(
                        variant.differentiator.0.to_owned(),
                        variant.differentiator.1.to_owned(),
                    )]),
                    image_url: None,
                    price_delta: Decimal::new(variant.price_delta_cents, 2),
                })
                .collect(),
            base_price: Decimal::new(seed.base_price_cents, 2),
        })
        .collect()
}

pub fn seed_retailers() -> Vec<Retailer> {
    RETAILER_SEEDS
        .iter()
        .map(|seed| Retailer {
            id: RetailerId(seed.id.to_owned()),
            name: seed.name.to_owned(),
            logo: Some(format!("https://logo.clearbit.com/{}", seed.domain)),
            trust_score: seed.trust_score,
            return_policy: seed.return_policy.to_owned(),
            warranty_info: Some(seed.warranty_info.to_owned()),
        })
        .collect()
}
