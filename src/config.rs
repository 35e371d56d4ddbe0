//! Tunable planning parameters and their environment overrides.

use crate::error::{ItineraryError, Result};
use crate::services::scoring::ScoringWeights;
use std::str::FromStr;

/// Minimum budget per person per night for a request to be plannable.
pub const MIN_PER_PERSON_PER_NIGHT: f64 = 1000.0;
/// How far a delay-driven transport swap may exceed the transport cap, as a fraction of it.
pub const DELAY_CAP_MARGIN: f64 = 0.25;
/// Delays at least this long trigger the extra-night suggestion.
pub const LONG_DELAY_MINUTES: u32 = 180;

pub const ENV_MIN_PER_PERSON_NIGHT: &str = "ITINERARY_MIN_PER_PERSON_NIGHT";
pub const ENV_DELAY_CAP_MARGIN: &str = "ITINERARY_DELAY_CAP_MARGIN";
pub const ENV_LONG_DELAY_MINUTES: &str = "ITINERARY_LONG_DELAY_MINUTES";
pub const ENV_CATALOG: &str = "ITINERARY_CATALOG";

#[derive(Debug, Clone, PartialEq)]
pub struct PlanningConfig {
    pub min_per_person_per_night: f64,
    pub delay_cap_margin: f64,
    pub long_delay_minutes: u32,
    pub scoring: ScoringWeights,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            min_per_person_per_night: MIN_PER_PERSON_PER_NIGHT,
            delay_cap_margin: DELAY_CAP_MARGIN,
            long_delay_minutes: LONG_DELAY_MINUTES,
            scoring: ScoringWeights::default(),
        }
    }
}

impl PlanningConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_per_person_per_night(mut self, floor: f64) -> Self {
        self.min_per_person_per_night = floor;
        self
    }

    pub fn with_delay_cap_margin(mut self, margin: f64) -> Self {
        self.delay_cap_margin = margin;
        self
    }

    pub fn with_long_delay_minutes(mut self, minutes: u32) -> Self {
        self.long_delay_minutes = minutes;
        self
    }

    pub fn with_scoring_weights(mut self, weights: ScoringWeights) -> Self {
        self.scoring = weights;
        self
    }

    /// Defaults overridden by `ITINERARY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `ITINERARY_*` key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(floor) = parse_var::<f64, _>(&lookup, ENV_MIN_PER_PERSON_NIGHT)? {
            config.min_per_person_per_night = floor;
        }
        if let Some(margin) = parse_var::<f64, _>(&lookup, ENV_DELAY_CAP_MARGIN)? {
            config.delay_cap_margin = margin;
        }
        if let Some(minutes) = parse_var::<u32, _>(&lookup, ENV_LONG_DELAY_MINUTES)? {
            config.long_delay_minutes = minutes;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_per_person_per_night.is_finite() || self.min_per_person_per_night < 0.0 {
            return Err(ItineraryError::Config(format!(
                "{} must be a non-negative number, got {}",
                ENV_MIN_PER_PERSON_NIGHT, self.min_per_person_per_night
            )));
        }
        if !self.delay_cap_margin.is_finite() || self.delay_cap_margin < 0.0 {
            return Err(ItineraryError::Config(format!(
                "{} must be a non-negative number, got {}",
                ENV_DELAY_CAP_MARGIN, self.delay_cap_margin
            )));
        }
        let floor = self.scoring.cost_reference_floor;
        if !floor.is_finite() || floor <= 0.0 {
            return Err(ItineraryError::Config(format!(
                "scoring cost_reference_floor must be positive, got {}",
                floor
            )));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|err| ItineraryError::Config(format!("invalid {} value {:?}: {}", key, raw, err)))
}
