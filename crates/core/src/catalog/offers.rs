use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use crate::catalog::seed::{RetailerProfile, RETAILER_PROFILES};
use crate::domain::offer::{DeliveryInfo, Offer, PriceBreakdown, ReviewSummary};
use crate::domain::product::{Product, ProductVariant};
use crate::domain::retailer::RetailerId;

pub const DEFAULT_CURRENCY: &str = "USD";

/// Prices a product at every retailer that carries its category.
#[derive(Clone, Debug)]
pub struct OfferBook {
    profiles: &'static [RetailerProfile],
    currency: String,
}

impl Default for OfferBook {
    fn default() -> Self {
        Self::new(RETAILER_PROFILES, DEFAULT_CURRENCY)
    }
}

impl OfferBook {
    pub fn new(profiles: &'static [RetailerProfile], currency: impl Into<String>) -> Self {
        Self { profiles, currency: currency.into() }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn offers_for(
        &self,
        product: &Product,
        variant: Option<&ProductVariant>,
        zip_code: Option<&str>,
        as_of: NaiveDate,
    ) -> Vec<Offer> {
        self.profiles
            .iter()
            .filter(|profile| profile.categories.contains(&product.category.as_str()))
            .map(|profile| self.price_offer(profile, product, variant, zip_code, as_of))
            .collect()
    }

    fn price_offer(
        &self,
        profile: &RetailerProfile,
        product: &Product,
        variant: Option<&ProductVariant>,
        zip_code: Option<&str>,
        as_of: NaiveDate,
    ) -> Offer {
        let list_price = product.price_for(variant);
        let item_price = (list_price * basis_points(profile.price_multiplier_bp)).round_dp(2);

        let shipping_cost =
            if profile.free_shipping_categories.contains(&product.category.as_str()) {
                Decimal::ZERO
            } else {
                Decimal::new(profile.shipping_cents, 2)
            };

        let installable = profile
            .installable_prefixes
            .iter()
            .any(|prefix| product.id.as_str().starts_with(prefix));
        let installation_cost = profile
            .installation_cents
            .filter(|_| installable)
            .map(|cents| Decimal::new(cents, 2));

        let tax = (item_price * basis_points(profile.tax_rate_bp)).round_dp(2);
        let is_estimated = zip_code.is_none() || installation_cost.is_some();

        let price = PriceBreakdown::itemized(
            item_price,
            shipping_cost,
            installation_cost,
            Some(tax),
            self.currency.clone(),
            is_estimated,
        );

        let estimated_delivery_date = as_of
            .checked_add_days(Days::new(u64::from(profile.max_days)))
            .unwrap_or(as_of);
        let delivery = DeliveryInfo {
            estimated_delivery_date,
            delivery_window: format!("{}-{} business days", profile.min_days, profile.max_days),
            min_days: profile.min_days,
            max_days: profile.max_days,
            shipping_method: profile.shipping_method.to_owned(),
            is_free_shipping: price.is_free_shipping(),
        };

        let reviews = ReviewSummary {
            rating: profile.rating,
            review_count: profile.review_count,
            sentiment_themes: profile
                .sentiment_themes
                .iter()
                .map(|theme| (*theme).to_owned())
                .collect(),
            verified_purchases: profile.verified_purchases,
        };

        let requested_id =
            variant.map(|variant| variant.id.as_str()).unwrap_or_else(|| product.id.as_str());

        Offer {
            retailer_id: RetailerId(profile.retailer_id.to_owned()),
            product_id: product.id.clone(),
            variant_id: variant.map(|variant| variant.id.clone()),
            price,
            delivery,
            reviews,
            purchase_url: format!("{}/product/{}", profile.storefront, requested_id),
        }
    }
}

fn basis_points(value: i64) -> Decimal {
    Decimal::new(value, 4)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::catalog::{Catalog, OfferBook};
    use crate::domain::offer::Offer;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date")
    }

    fn offer<'a>(offers: &'a [Offer], retailer: &str) -> &'a Offer {
        offers
            .iter()
            .find(|offer| offer.retailer_id.as_str() == retailer)
            .unwrap_or_else(|| panic!("missing {retailer} offer"))
    }

    #[test]
    fn electronics_are_priced_at_three_retailers() {
        let catalog = Catalog::seeded();
        let resolved = catalog.resolve("tv-samsung-55").expect("seeded tv");
        let offers = OfferBook::default().offers_for(
            &resolved.product,
            resolved.variant.as_ref(),
            Some("90210"),
            as_of(),
        );

        let mut retailers: Vec<&str> =
            offers.iter().map(|offer| offer.retailer_id.as_str()).collect();
        retailers.sort_unstable();
        assert_eq!(retailers, vec!["amazon", "bestbuy", "walmart"]);

        let walmart = offer(&offers, "walmart");
        assert_eq!(walmart.price.item_price, Decimal::new(45_119, 2));
        assert_eq!(walmart.price.tax, Some(Decimal::new(3_610, 2)));
        assert_eq!(walmart.price.total_cost, Decimal::new(48_729, 2));
        assert!(!walmart.price.is_estimated);

        let bestbuy = offer(&offers, "bestbuy");
        assert_eq!(bestbuy.price.installation_cost, Some(Decimal::new(4_999, 2)));
        assert_eq!(bestbuy.price.total_cost, Decimal::new(55_801, 2));
        assert!(bestbuy.price.is_estimated);

        assert!(offers.iter().all(|offer| offer.price.is_consistent()));
    }

    #[test]
    fn tools_ship_free_from_home_depot_and_delivery_date_uses_max_days() {
        let catalog = Catalog::seeded();
        let resolved = catalog.resolve("drill-dewalt-combo").expect("seeded drill");
        let offers = OfferBook::default().offers_for(
            &resolved.product,
            resolved.variant.as_ref(),
            None,
            as_of(),
        );

        let homedepot = offer(&offers, "homedepot");
        assert!(homedepot.delivery.is_free_shipping);
        assert_eq!(homedepot.delivery.delivery_window, "3-5 business days");
        assert_eq!(
            homedepot.delivery.estimated_delivery_date,
            NaiveDate::from_ymd_opt(2026, 3, 7).expect("valid date")
        );
        assert_eq!(homedepot.purchase_url, "https://www.homedepot.com/product/drill-dewalt-combo");
        assert!(homedepot.price.is_estimated);
        assert!(offers.iter().all(|offer| offer.retailer_id.as_str() != "bestbuy"));
    }

    #[test]
    fn appliances_charge_home_depot_shipping() {
        let catalog = Catalog::seeded();
        let resolved = catalog.resolve("mixer-kitchenaid").expect("seeded mixer");
        let offers = OfferBook::default().with_currency("CAD").offers_for(
            &resolved.product,
            None,
            Some("10001"),
            as_of(),
        );

        let homedepot = offer(&offers, "homedepot");
        assert_eq!(homedepot.price.shipping_cost, Decimal::new(599, 2));
        assert!(!homedepot.delivery.is_free_shipping);
        assert_eq!(homedepot.price.currency, "CAD");
        assert_eq!(offers.len(), 4);
    }
}
