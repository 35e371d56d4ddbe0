//! Activity Scorer: ranks substitutes for an activity a disruption removed.
//!
//! ```text
//! score = TYPE_WEIGHT    * type_similarity
//!       + SETTING_WEIGHT * setting_bonus
//!       + VALUE_WEIGHT   * value_retention
//!       - COST_WEIGHT    * cost_delta
//! ```
//!
//! * `type_similarity`: 1.0 for the same `type`, otherwise the share of attribute
//!   keys both options hold with equal values.
//! * `setting_bonus`: 1.0 when an indoor candidate replaces an outdoor activity
//!   under outdoor-impacting weather.
//! * `value_retention`: candidate value over removed value, clamped to
//!   `[0, VALUE_RETENTION_CAP]`.
//! * `cost_delta`: price increase over the removed option, relative to
//!   `max(removed.price, COST_REFERENCE_FLOOR)`.
//!
//! Under outdoor-impacting weather only explicitly indoor candidates are ranked.

use crate::types::{Disruption, TravelOption};
use tracing::debug;

pub const TYPE_WEIGHT: f64 = 0.35;
pub const SETTING_WEIGHT: f64 = 0.25;
pub const VALUE_WEIGHT: f64 = 0.30;
pub const COST_WEIGHT: f64 = 0.10;
pub const VALUE_RETENTION_CAP: f64 = 1.5;
pub const COST_REFERENCE_FLOOR: f64 = 1000.0;

/// Coefficients of the substitution score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    pub type_weight: f64,
    pub setting_weight: f64,
    pub value_weight: f64,
    pub cost_weight: f64,
    pub value_retention_cap: f64,
    pub cost_reference_floor: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            type_weight: TYPE_WEIGHT,
            setting_weight: SETTING_WEIGHT,
            value_weight: VALUE_WEIGHT,
            cost_weight: COST_WEIGHT,
            value_retention_cap: VALUE_RETENTION_CAP,
            cost_reference_floor: COST_REFERENCE_FLOOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub option: TravelOption,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ActivityScorer {
    weights: ScoringWeights,
}

impl ActivityScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank `candidates` as replacements for `removed`.
    ///
    /// Sorted by descending score, then lowest price, then input order.
    /// `removed` itself never appears in the result.
    pub fn score_candidates(
        &self,
        removed: &TravelOption,
        candidates: &[TravelOption],
        disruption: &Disruption,
    ) -> Vec<ScoredCandidate> {
        let weather = disruption.is_outdoor_weather();

        let mut ranked: Vec<ScoredCandidate> = candidates
            .iter()
            .filter(|candidate| candidate.id != removed.id)
            .filter(|candidate| !weather || candidate.is_indoor())
            .map(|candidate| ScoredCandidate {
                score: self.score(removed, candidate, weather),
                option: candidate.clone(),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.option.price.total_cmp(&b.option.price))
        });

        debug!(
            target: "itinerary::scorer",
            "Ranked {} of {} candidates for {}",
            ranked.len(),
            candidates.len(),
            removed.id
        );
        ranked
    }

    /// Weighted score of one candidate
    pub fn score(&self, removed: &TravelOption, candidate: &TravelOption, weather: bool) -> f64 {
        let w = &self.weights;

        let setting_bonus = if weather && removed.is_outdoor() && candidate.is_indoor() {
            1.0
        } else {
            0.0
        };

        let value_retention = if removed.value_score > 0.0 {
            (candidate.value_score / removed.value_score).clamp(0.0, w.value_retention_cap)
        } else {
            1.0
        };

        let reference = removed.price.max(w.cost_reference_floor);
        let cost_delta = if reference > 0.0 {
            (candidate.price - removed.price).max(0.0) / reference
        } else {
            0.0
        };

        w.type_weight * type_similarity(removed, candidate)
            + w.setting_weight * setting_bonus
            + w.value_weight * value_retention
            - w.cost_weight * cost_delta
    }
}

/// 1.0 for the same kind, otherwise the attribute overlap.
pub fn type_similarity(a: &TravelOption, b: &TravelOption) -> f64 {
    if a.kind == b.kind {
        1.0
    } else {
        attribute_overlap(a, b)
    }
}

/// Keys held by both with equal values, over the union of keys. 0 when both are empty.
pub fn attribute_overlap(a: &TravelOption, b: &TravelOption) -> f64 {
    let shared = a
        .attributes
        .iter()
        .filter(|(key, value)| b.attributes.get(*key) == Some(*value))
        .count();
    let union = a.attributes.len()
        + b.attributes
            .keys()
            .filter(|key| !a.attributes.contains_key(*key))
            .count();

    if union == 0 {
        0.0
    } else {
        shared as f64 / union as f64
    }
}
