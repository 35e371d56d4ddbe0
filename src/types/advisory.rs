use serde::{Deserialize, Serialize};
use std::fmt;

pub const PEAK_SEASON: &str = "peak_season";

/// Notice about the trip that changes no slot, only what the traveller is told.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub name: String,
    pub recommendation: String,
}

impl Advisory {
    pub fn new(name: impl Into<String>, recommendation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recommendation: recommendation.into(),
        }
    }

    pub fn peak_season() -> Self {
        Self::new(
            PEAK_SEASON,
            "peak season detected: book early and monitor prices",
        )
    }

    /// Advisory for an event name. Unknown names are recorded without a recommendation change.
    pub fn named(name: &str) -> Self {
        match name.trim() {
            PEAK_SEASON => Self::peak_season(),
            other => Self::new(other, "noted, schedule unchanged"),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.recommendation)
    }
}
