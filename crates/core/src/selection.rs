//! Picks at most one offer per recommendation type, each from a different retailer.

use std::cmp::Ordering;
use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::warn;

use crate::catalog::{ResolvedProduct, RetailerDirectory};
use crate::domain::offer::Offer;
use crate::domain::preferences::PreferenceWeights;
use crate::domain::recommendation::{
    Impact, Recommendation, RecommendationType, Score, Tradeoff, TradeoffCategory,
};
use crate::domain::retailer::{Retailer, RetailerId};
use crate::errors::ValidationError;
use crate::scoring::ScoreCalculator;

/// Price gap under which two picks are treated as costing the same.
const PRICE_PARITY: Decimal = Decimal::ONE;

#[derive(Debug, Clone)]
struct Candidate<'a> {
    offer: &'a Offer,
    retailer: &'a Retailer,
    score: Score,
}

impl Candidate<'_> {
    fn total(&self) -> Decimal {
        self.offer.price.total_cost
    }

    fn retailer_id(&self) -> &str {
        self.retailer.id.as_str()
    }

    fn trust_plus_quality(&self) -> u16 {
        u16::from(self.score.trust) + u16::from(self.score.quality)
    }
}

#[derive(Debug, Clone)]
pub struct RecommendationSelector {
    calculator: ScoreCalculator,
}

impl RecommendationSelector {
    pub fn new(weights: &PreferenceWeights) -> Result<Self, ValidationError> {
        Ok(Self { calculator: ScoreCalculator::new(weights)? })
    }

    pub fn select(
        &self,
        resolved: &ResolvedProduct,
        offers: &[Offer],
        directory: &RetailerDirectory,
    ) -> Vec<Recommendation> {
        let eligible: Vec<(&Offer, &Retailer)> = offers
            .iter()
            .filter_map(|offer| eligible_offer(offer, directory))
            .collect();
        let scores = self.calculator.score_all(&eligible);
        let candidates: Vec<Candidate<'_>> = eligible
            .into_iter()
            .zip(scores)
            .map(|((offer, retailer), score)| Candidate { offer, retailer, score })
            .collect();

        let mut used: HashSet<&RetailerId> = HashSet::new();
        let mut picks: Vec<(RecommendationType, &Candidate<'_>)> = Vec::new();
        for kind in RecommendationType::ALL {
            let best = candidates
                .iter()
                .filter(|candidate| !used.contains(&candidate.retailer.id))
                .min_by(|left, right| rank(kind, left, right));
            if let Some(candidate) = best {
                used.insert(&candidate.retailer.id);
                picks.push((kind, candidate));
            }
        }

        let picked: Vec<&Candidate<'_>> = picks.iter().map(|(_, candidate)| *candidate).collect();
        picks
            .iter()
            .map(|(kind, candidate)| Recommendation {
                id: format!("rec-{}-{}", resolved.requested_id(), kind.id_suffix()),
                kind: *kind,
                product: resolved.product.clone(),
                variant: resolved.variant.clone(),
                retailer: candidate.retailer.clone(),
                price_breakdown: candidate.offer.price.clone(),
                delivery: candidate.offer.delivery.clone(),
                reviews: candidate.offer.reviews.clone(),
                scores: candidate.score,
                why_selected: why_selected(*kind, candidate),
                tradeoffs: tradeoffs(candidate, &picked),
                purchase_url: candidate.offer.purchase_url.clone(),
            })
            .collect()
    }
}

fn eligible_offer<'a>(
    offer: &'a Offer,
    directory: &'a RetailerDirectory,
) -> Option<(&'a Offer, &'a Retailer)> {
    if !offer.price.is_consistent() {
        warn!(
            event_name = "selection.offer_excluded",
            retailer_id = %offer.retailer_id,
            product_id = %offer.product_id,
            total_cost = %offer.price.total_cost,
            component_total = %offer.price.component_total(),
            reason = "total_cost_mismatch",
            "offer excluded from selection"
        );
        return None;
    }
    let Some(retailer) = directory.get(&offer.retailer_id) else {
        warn!(
            event_name = "selection.offer_excluded",
            retailer_id = %offer.retailer_id,
            product_id = %offer.product_id,
            reason = "unknown_retailer",
            "offer excluded from selection"
        );
        return None;
    };
    Some((offer, retailer))
}

/// `Less` means `left` is the better pick for `kind`.
fn rank(kind: RecommendationType, left: &Candidate<'_>, right: &Candidate<'_>) -> Ordering {
    let by_id = || left.retailer_id().cmp(right.retailer_id());
    match kind {
        RecommendationType::BestValue => left
            .total()
            .cmp(&right.total())
            .then_with(|| right.retailer.trust_score.cmp(&left.retailer.trust_score))
            .then_with(by_id),
        RecommendationType::FastestDelivery => {
            let window = |candidate: &Candidate<'_>| {
                (candidate.offer.delivery.max_days, candidate.offer.delivery.min_days)
            };
            window(left)
                .cmp(&window(right))
                .then_with(|| left.total().cmp(&right.total()))
                .then_with(by_id)
        }
        RecommendationType::BestQuality => right
            .trust_plus_quality()
            .cmp(&left.trust_plus_quality())
            .then_with(|| right.offer.reviews.rating.total_cmp(&left.offer.reviews.rating))
            .then_with(by_id),
    }
}

fn why_selected(kind: RecommendationType, candidate: &Candidate<'_>) -> String {
    let offer = candidate.offer;
    match kind {
        RecommendationType::BestValue => {
            let shipping =
                if offer.price.is_free_shipping() { " with free shipping" } else { "" };
            format!(
                "Lowest total cost at ${:.2}{shipping} and a value score of {}/100",
                offer.price.total_cost, candidate.score.value
            )
        }
        RecommendationType::FastestDelivery => format!(
            "Fastest delivery: {} via {}",
            offer.delivery.delivery_window, offer.delivery.shipping_method
        ),
        RecommendationType::BestQuality => {
            let installation = if offer.price.installation_cost.is_some() {
                " with professional installation available"
            } else {
                ""
            };
            format!(
                "Highest trust and quality: rated {:.1}/5 from {} reviews at a retailer trusted {}/100{installation}",
                offer.reviews.rating, offer.reviews.review_count, candidate.retailer.trust_score
            )
        }
    }
}

/// Pros and cons of `candidate` compared with the other picks, ordered
/// price, speed, trust, quality. A lone pick has nothing to compare against.
fn tradeoffs(candidate: &Candidate<'_>, picks: &[&Candidate<'_>]) -> Vec<Tradeoff> {
    if picks.len() < 2 {
        return Vec::new();
    }
    let mut tradeoffs = Vec::new();

    let cheapest = picks.iter().map(|pick| pick.total()).min().unwrap_or_default();
    let premium = candidate.total() - cheapest;
    if premium.is_zero() {
        tradeoffs.push(Tradeoff::new(
            TradeoffCategory::Price,
            "Lowest total cost of the recommended options",
            Impact::Positive,
        ));
    } else if premium <= PRICE_PARITY {
        tradeoffs.push(Tradeoff::new(
            TradeoffCategory::Price,
            "Priced within $1 of the cheapest option",
            Impact::Neutral,
        ));
    } else {
        let installation =
            if candidate.offer.price.installation_cost.is_some() { " (includes installation)" } else { "" };
        tradeoffs.push(Tradeoff::new(
            TradeoffCategory::Price,
            format!("${:.0} more than cheapest option{installation}", premium.round()),
            Impact::Negative,
        ));
    }

    let max_days = |pick: &&Candidate<'_>| pick.offer.delivery.max_days;
    let fastest = picks.iter().map(max_days).min().unwrap_or_default();
    let slowest = picks.iter().map(max_days).max().unwrap_or_default();
    let days = candidate.offer.delivery.max_days;
    if fastest < slowest {
        if days == fastest {
            let gap = slowest - days;
            let unit = if gap == 1 { "day" } else { "days" };
            tradeoffs.push(Tradeoff::new(
                TradeoffCategory::Speed,
                format!("Arrives {gap} {unit} faster"),
                Impact::Positive,
            ));
        } else if days == slowest {
            tradeoffs.push(Tradeoff::new(
                TradeoffCategory::Speed,
                "Slower delivery than competitors",
                Impact::Negative,
            ));
        }
    }

    let trust = |pick: &&Candidate<'_>| pick.retailer.trust_score;
    let top_trust = picks.iter().map(trust).max().unwrap_or_default();
    let low_trust = picks.iter().map(trust).min().unwrap_or_default();
    if low_trust < top_trust && candidate.retailer.trust_score == top_trust {
        tradeoffs.push(Tradeoff::new(
            TradeoffCategory::Trust,
            "Highest retailer trust score",
            Impact::Positive,
        ));
    }

    let quality = |pick: &&Candidate<'_>| pick.score.quality;
    let top_quality = picks.iter().map(quality).max().unwrap_or_default();
    let low_quality = picks.iter().map(quality).min().unwrap_or_default();
    if low_quality < top_quality && candidate.score.quality == top_quality {
        tradeoffs.push(Tradeoff::new(
            TradeoffCategory::Quality,
            format!(
                "Best reviewed: {:.1} stars from {} reviews",
                candidate.offer.reviews.rating, candidate.offer.reviews.review_count
            ),
            Impact::Positive,
        ));
    }

    tradeoffs
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::catalog::{Catalog, OfferBook, ResolvedProduct, RetailerDirectory};
    use crate::domain::offer::Offer;
    use crate::domain::preferences::{PreferenceWeights, PresetType};
    use crate::domain::recommendation::{Impact, RecommendationType, TradeoffCategory};
    use crate::selection::RecommendationSelector;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date")
    }

    fn fixture(id: &str) -> (ResolvedProduct, Vec<Offer>) {
        let resolved = Catalog::seeded().resolve(id).expect("seeded product");
        let offers = OfferBook::default().offers_for(
            &resolved.product,
            resolved.variant.as_ref(),
            Some("90210"),
            as_of(),
        );
        (resolved, offers)
    }

    #[test]
    fn samsung_tv_fills_every_slot_with_distinct_retailers() {
        let (resolved, offers) = fixture("tv-samsung-55");
        let selector =
            RecommendationSelector::new(&PresetType::BestValue.weights()).expect("valid weights");

        let picks = selector.select(&resolved, &offers, &RetailerDirectory::seeded());

        let summary: Vec<(RecommendationType, &str)> =
            picks.iter().map(|pick| (pick.kind, pick.retailer.id.as_str())).collect();
        assert_eq!(
            summary,
            vec![
                (RecommendationType::BestValue, "walmart"),
                (RecommendationType::FastestDelivery, "amazon"),
                (RecommendationType::BestQuality, "bestbuy"),
            ]
        );
        assert_eq!(picks[0].id, "rec-tv-samsung-55-value");
        assert_eq!(picks[1].id, "rec-tv-samsung-55-fast");
        assert_eq!(picks[2].id, "rec-tv-samsung-55-quality");
        assert!(picks[0].why_selected.starts_with("Lowest total cost at $487.29 with free shipping"));
        assert!(picks[2].why_selected.ends_with("with professional installation available"));
    }

    #[test]
    fn tradeoffs_compare_picks_in_category_order() {
        let (resolved, offers) = fixture("tv-samsung-55");
        let selector =
            RecommendationSelector::new(&PresetType::BestValue.weights()).expect("valid weights");
        let picks = selector.select(&resolved, &offers, &RetailerDirectory::seeded());

        let value = &picks[0];
        assert_eq!(value.tradeoffs[0].category, TradeoffCategory::Price);
        assert_eq!(value.tradeoffs[0].impact, Impact::Positive);
        assert_eq!(value.tradeoffs[1].description, "Slower delivery than competitors");

        let fast = &picks[1];
        assert_eq!(fast.tradeoffs[0].description, "$31 more than cheapest option");
        assert_eq!(fast.tradeoffs[1].description, "Arrives 4 days faster");

        let quality = &picks[2];
        let categories: Vec<TradeoffCategory> =
            quality.tradeoffs.iter().map(|tradeoff| tradeoff.category).collect();
        assert_eq!(
            categories,
            vec![TradeoffCategory::Price, TradeoffCategory::Trust, TradeoffCategory::Quality]
        );
        assert!(quality.tradeoffs[0].description.ends_with("(includes installation)"));
    }

    #[test]
    fn retailers_are_never_repeated_across_slots() {
        let directory = RetailerDirectory::seeded();
        for product in Catalog::seeded().search("a").products {
            let (resolved, offers) = fixture(product.id.as_str());
            for preset in [PresetType::BestValue, PresetType::FastestDelivery, PresetType::MostTrusted] {
                let selector = RecommendationSelector::new(&preset.weights()).expect("valid weights");
                let picks = selector.select(&resolved, &offers, &directory);
                let retailers: HashSet<&str> =
                    picks.iter().map(|pick| pick.retailer.id.as_str()).collect();
                assert_eq!(retailers.len(), picks.len(), "{} repeats a retailer", product.id);
            }
        }
    }

    #[test]
    fn inconsistent_offer_is_excluded() {
        let (resolved, mut offers) = fixture("tv-samsung-55");
        let walmart = offers
            .iter_mut()
            .find(|offer| offer.retailer_id.as_str() == "walmart")
            .expect("walmart offer");
        walmart.price.total_cost -= Decimal::new(100, 0);
        let selector =
            RecommendationSelector::new(&PresetType::BestValue.weights()).expect("valid weights");

        let picks = selector.select(&resolved, &offers, &RetailerDirectory::seeded());

        assert_eq!(picks.len(), 2);
        assert!(picks.iter().all(|pick| pick.retailer.id.as_str() != "walmart"));
        assert_eq!(picks[0].retailer.id.as_str(), "amazon");
    }

    #[test]
    fn missing_slots_are_absent_and_single_pick_has_no_tradeoffs() {
        let (resolved, offers) = fixture("tv-samsung-55");
        let only_amazon: Vec<Offer> = offers
            .into_iter()
            .filter(|offer| offer.retailer_id.as_str() == "amazon")
            .collect();
        let selector = RecommendationSelector::new(&PreferenceWeights::EQUAL).expect("valid weights");

        let picks = selector.select(&resolved, &only_amazon, &RetailerDirectory::seeded());

        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].kind, RecommendationType::BestValue);
        assert!(picks[0].tradeoffs.is_empty());
        assert!(selector.select(&resolved, &[], &RetailerDirectory::seeded()).is_empty());
    }
}
