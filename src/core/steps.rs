use crate::bus::EventKind;
use crate::types::{Advisory, BudgetSpec, Disruption};
use serde::{Deserialize, Serialize};

/// One entry in a session's step log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionStep {
    /// Planning request received
    Request { spec: BudgetSpec },
    /// Request rejected before planning
    Rejected { reason: String },
    /// Plan recorded in the history
    Planned {
        revision: usize,
        total_cost: f64,
        feasible: bool,
    },
    /// Disruption received for the current plan
    Disruption { disruption: Disruption },
    /// Plan produced by replanning
    Replanned {
        revision: usize,
        total_cost: f64,
        feasible: bool,
        changed_slots: usize,
    },
    /// Advisory event attached to the current plan
    Advisory { advisory: Advisory },
    BudgetChanged { from: f64, to: f64 },
    /// Event handed to the bus
    Published { kind: EventKind, sequence: u64 },
}

impl SessionStep {
    /// Get a human-readable description of the step
    pub fn describe(&self) -> String {
        match self {
            SessionStep::Request { spec } => format!(
                "🧭 Request: {:.2} for {} people over {} nights",
                spec.total_budget, spec.people_count, spec.nights
            ),
            SessionStep::Rejected { reason } => format!("❌ Rejected: {}", reason),
            SessionStep::Planned {
                revision,
                total_cost,
                feasible,
            } => format!(
                "🧩 Plan #{}: total {:.2}{}",
                revision,
                total_cost,
                if *feasible { "" } else { " (over budget)" }
            ),
            SessionStep::Disruption { disruption } => format!("⚠ Disruption: {}", disruption),
            SessionStep::Replanned {
                revision,
                total_cost,
                feasible,
                changed_slots,
            } => format!(
                "🔧 Replan #{}: total {:.2}, {} slot(s) changed{}",
                revision,
                total_cost,
                changed_slots,
                if *feasible { "" } else { " (over budget)" }
            ),
            SessionStep::Advisory { advisory } => format!("📌 Advisory: {}", advisory),
            SessionStep::BudgetChanged { from, to } => {
                format!("💰 Budget: {:.2} -> {:.2}", from, to)
            }
            SessionStep::Published { kind, sequence } => {
                format!("📣 Published {} #{}", kind, sequence)
            }
        }
    }
}
