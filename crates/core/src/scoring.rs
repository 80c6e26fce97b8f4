//! Per-offer scoring against the shopper's preference weights.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::offer::Offer;
use crate::domain::preferences::PreferenceWeights;
use crate::domain::recommendation::Score;
use crate::domain::retailer::Retailer;
use crate::errors::ValidationError;

/// Points lost per percent paid above the cheapest eligible offer.
const VALUE_PENALTY_PER_PREMIUM_PCT: f64 = 2.0;
/// Points lost per delivery day beyond the first.
const SPEED_PENALTY_PER_DAY: f64 = 7.0;
/// Review count at which a rating is taken at face value.
const FULL_CONFIDENCE_REVIEWS: f64 = 50.0;
const NEUTRAL_QUALITY: f64 = 50.0;

/// Unrounded sub-scores, each already clamped to 0..=100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawScore {
    pub value: f64,
    pub speed: f64,
    pub trust: f64,
    pub quality: f64,
}

impl RawScore {
    pub fn weighted(&self, weights: &PreferenceWeights) -> f64 {
        self.value * weights.value
            + self.speed * weights.speed
            + self.trust * weights.trust
            + self.quality * weights.quality
    }
}

#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    weights: PreferenceWeights,
}

impl ScoreCalculator {
    /// Rejects weights outside 0.0..=1.0 and keeps the normalized vector.
    pub fn new(weights: &PreferenceWeights) -> Result<Self, ValidationError> {
        weights.validate()?;
        Ok(Self { weights: weights.normalized() })
    }

    pub fn weights(&self) -> &PreferenceWeights {
        &self.weights
    }

    pub fn value_score(&self, total_cost: Decimal, cheapest_total: Decimal) -> f64 {
        if total_cost <= cheapest_total {
            return 100.0;
        }
        if cheapest_total <= Decimal::ZERO {
            return 0.0;
        }
        let premium_pct = ((total_cost - cheapest_total) / cheapest_total * Decimal::ONE_HUNDRED)
            .to_f64()
            .unwrap_or(f64::INFINITY);
        clamp(100.0 - VALUE_PENALTY_PER_PREMIUM_PCT * premium_pct)
    }

    pub fn speed_score(&self, max_days: u32) -> f64 {
        let extra_days = f64::from(max_days.saturating_sub(1));
        clamp(100.0 - SPEED_PENALTY_PER_DAY * extra_days)
    }

    pub fn trust_score(&self, trust_score: u8) -> f64 {
        clamp(f64::from(trust_score))
    }

    /// `rating * 20`, pulled toward the neutral midpoint while reviews are scarce.
    pub fn quality_score(&self, rating: f64, review_count: u32) -> f64 {
        let face_value = clamp(rating * 20.0);
        let confidence = (f64::from(review_count) / FULL_CONFIDENCE_REVIEWS).min(1.0);
        clamp(NEUTRAL_QUALITY + (face_value - NEUTRAL_QUALITY) * confidence)
    }

    pub fn raw_score(&self, offer: &Offer, retailer: &Retailer, cheapest_total: Decimal) -> RawScore {
        RawScore {
            value: self.value_score(offer.price.total_cost, cheapest_total),
            speed: self.speed_score(offer.delivery.max_days),
            trust: self.trust_score(retailer.trust_score),
            quality: self.quality_score(offer.reviews.rating, offer.reviews.review_count),
        }
    }

    /// Scores every offer relative to the others. Output order matches input order.
    pub fn score_all(&self, offers: &[(&Offer, &Retailer)]) -> Vec<Score> {
        let Some(cheapest_total) = offers.iter().map(|(offer, _)| offer.price.total_cost).min()
        else {
            return Vec::new();
        };

        let raw: Vec<RawScore> = offers
            .iter()
            .map(|(offer, retailer)| self.raw_score(offer, retailer, cheapest_total))
            .collect();
        let weighted: Vec<f64> = raw.iter().map(|score| score.weighted(&self.weights)).collect();
        let best_weighted = weighted.iter().copied().fold(0.0_f64, f64::max);

        raw.iter()
            .zip(weighted)
            .map(|(score, weighted)| {
                let fit = if best_weighted > 0.0 { weighted / best_weighted * 100.0 } else { 100.0 };
                Score {
                    value: to_score(score.value),
                    speed: to_score(score.speed),
                    trust: to_score(score.trust),
                    quality: to_score(score.quality),
                    fit: to_score(fit),
                    overall: to_score(weighted),
                }
            })
            .collect()
    }
}

fn clamp(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

fn to_score(score: f64) -> u8 {
    // clamp() bounds the value to 0..=100, so the cast cannot truncate.
    clamp(score).round() as u8
}
