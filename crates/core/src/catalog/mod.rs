pub mod offers;
pub mod seed;

use crate::domain::product::{Product, ProductId, ProductVariant, SearchResult};
use crate::domain::retailer::{Retailer, RetailerId};

pub use offers::OfferBook;

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

/// A product together with the variant an id resolved to, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedProduct {
    pub product: Product,
    pub variant: Option<ProductVariant>,
}

impl ResolvedProduct {
    /// The id the caller asked about: the variant id when one matched.
    pub fn requested_id(&self) -> &str {
        self.variant
            .as_ref()
            .map(|variant| variant.id.as_str())
            .unwrap_or_else(|| self.product.id.as_str())
    }
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn seeded() -> Self {
        Self::new(seed::seed_products())
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    /// Every whitespace-separated token of `query` must appear in the product's
    /// searchable text. Results keep catalog order.
    pub fn search(&self, query: &str) -> SearchResult {
        let tokens: Vec<String> =
            query.split_whitespace().map(|token| token.to_lowercase()).collect();
        if tokens.is_empty() {
            return SearchResult::empty();
        }

        let products = self
            .products
            .iter()
            .filter(|product| {
                let haystack = product.searchable_text();
                tokens.iter().all(|token| haystack.contains(token.as_str()))
            })
            .cloned()
            .collect();
        SearchResult::from_products(products)
    }

    pub fn variants(&self, product_id: &ProductId) -> Vec<ProductVariant> {
        self.find(product_id).map(|product| product.variants.clone()).unwrap_or_default()
    }

    /// Accepts a product id or a variant id. A product id that is also one of its own
    /// variant ids resolves to that variant.
    pub fn resolve(&self, id: &str) -> Option<ResolvedProduct> {
        if let Some(product) = self.products.iter().find(|product| product.id.as_str() == id) {
            return Some(ResolvedProduct {
                product: product.clone(),
                variant: product.variant(id).cloned(),
            });
        }

        self.products.iter().find_map(|product| {
            product.variant(id).map(|variant| ResolvedProduct {
                product: product.clone(),
                variant: Some(variant.clone()),
            })
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct RetailerDirectory {
    retailers: Vec<Retailer>,
}

impl RetailerDirectory {
    pub fn new(retailers: Vec<Retailer>) -> Self {
        Self { retailers }
    }

    pub fn seeded() -> Self {
        Self::new(seed::seed_retailers())
    }

    pub fn get(&self, retailer_id: &RetailerId) -> Option<&Retailer> {
        self.retailers.iter().find(|retailer| &retailer.id == retailer_id)
    }

    pub fn all(&self) -> &[Retailer] {
        &self.retailers
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::{Catalog, RetailerDirectory};
    use crate::domain::product::ProductId;
    use crate::domain::retailer::RetailerId;

    #[test]
    fn search_requires_every_token_to_match() {
        let catalog = Catalog::seeded();

        let result = catalog.search("Samsung TV");
        assert_eq!(result.total_count, 1);
        assert_eq!(result.products[0].id.as_str(), "tv-samsung-55");

        let sony = catalog.search("sony");
        let ids: Vec<&str> = sony.products.iter().map(|product| product.id.as_str()).collect();
        assert_eq!(ids, vec!["tv-sony-55", "headphones-sony"]);
    }

    #[test]
    fn search_matches_category_and_is_case_insensitive() {
        let catalog = Catalog::seeded();

        let tools = catalog.search("TOOLS");
        assert_eq!(tools.total_count, 3);
        assert!(tools.products.iter().all(|product| product.category == "Tools"));
    }

    #[test]
    fn unmatched_or_blank_query_is_empty_not_error() {
        let catalog = Catalog::seeded();

        let result = catalog.search("zzznonexistentproduct");
        assert!(result.products.is_empty());
        assert_eq!(result.total_count, 0);
        assert_eq!(catalog.search("   ").total_count, 0);
    }

    #[test]
    fn resolve_accepts_product_and_variant_ids() {
        let catalog = Catalog::seeded();

        let product = catalog.resolve("drill-dewalt").expect("product id resolves");
        assert_eq!(product.product.id.as_str(), "drill-dewalt");
        assert!(product.variant.is_none());
        assert_eq!(product.requested_id(), "drill-dewalt");

        let variant = catalog.resolve("tv-lg-77").expect("variant id resolves");
        assert_eq!(variant.product.id.as_str(), "tv-lg-55");
        assert_eq!(variant.requested_id(), "tv-lg-77");

        let same_id = catalog.resolve("tv-samsung-55").expect("product id resolves");
        assert_eq!(same_id.variant.map(|variant| variant.name), Some("55\" Model".to_owned()));

        assert!(catalog.resolve("does-not-exist").is_none());
    }

    #[test]
    fn variants_of_unknown_product_are_empty() {
        let catalog = Catalog::seeded();

        assert_eq!(catalog.variants(&ProductId("tv-tcl-55".to_owned())).len(), 4);
        assert!(catalog.variants(&ProductId("nope".to_owned())).is_empty());
    }

    #[test]
    fn directory_looks_up_retailers_by_id() {
        let directory = RetailerDirectory::seeded();

        assert_eq!(directory.all().len(), 4);
        let bestbuy = directory.get(&RetailerId("bestbuy".to_owned())).expect("bestbuy exists");
        assert_eq!(bestbuy.trust_score, 88);
        assert!(directory.get(&RetailerId("target".to_owned())).is_none());
    }
}
