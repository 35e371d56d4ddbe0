use crate::types::PlanReport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable tag set of events the coordinator publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PlanCreated,
    PlanUpdated,
    ValidationFailed,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PlanCreated => "plan_created",
            EventKind::PlanUpdated => "plan_updated",
            EventKind::ValidationFailed => "validation_failed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound event: one report, tagged with its session and a per-session sequence number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryEvent {
    pub session_id: String,
    /// Starts at 1 and increases by one per published event of the session
    pub sequence: u64,
    pub kind: EventKind,
    pub report: PlanReport,
}
