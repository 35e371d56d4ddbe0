use super::disruption::Disruption;
use super::option::TravelOption;
use super::plan::Plan;
use crate::error::ItineraryError;
use serde::{Deserialize, Serialize};

/// Outcome of running the budget validator over a request or a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationStatus {
    Valid,
    BudgetExceeded { amount_over: f64 },
    InfeasibleBudget { reason: String },
}

impl ValidationStatus {
    /// Translate a validator error; anything else is not a validation outcome.
    pub fn from_error(error: &ItineraryError) -> Option<Self> {
        match error {
            ItineraryError::BudgetExceeded { amount_over } => Some(ValidationStatus::BudgetExceeded {
                amount_over: *amount_over,
            }),
            ItineraryError::InfeasibleBudget(reason) => Some(ValidationStatus::InfeasibleBudget {
                reason: reason.clone(),
            }),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationStatus::Valid)
    }
}

/// Structured result the coordinator publishes for every request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    pub session_id: String,
    /// Position of `plan` in the session history, absent when rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<usize>,
    /// Best-effort plan; absent only when the request itself was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    pub validation: ValidationStatus,
    /// Disruption that produced this plan, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Disruption>,
}

impl PlanReport {
    pub fn accepted(
        session_id: impl Into<String>,
        revision: usize,
        plan: Plan,
        validation: ValidationStatus,
        trigger: Option<Disruption>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            revision: Some(revision),
            plan: Some(plan),
            validation,
            trigger,
        }
    }

    pub fn rejected(session_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            revision: None,
            plan: None,
            validation: ValidationStatus::InfeasibleBudget {
                reason: reason.into(),
            },
            trigger: None,
        }
    }

    /// Feasible plan, validated, with nothing flagged
    pub fn is_success(&self) -> bool {
        self.validation.is_valid() && self.plan.as_ref().is_some_and(|plan| plan.feasible)
    }

    pub fn is_rejected(&self) -> bool {
        self.plan.is_none()
    }

    /// Generate a human-readable summary of the report
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("=== Itinerary Report ({}) ===", self.session_id));
        if let Some(revision) = self.revision {
            lines.push(format!("Revision: {}", revision));
        }
        if let Some(trigger) = &self.trigger {
            lines.push(format!("Trigger: {}", trigger));
        }

        match &self.validation {
            ValidationStatus::Valid => lines.push("Validation: ok".to_string()),
            ValidationStatus::BudgetExceeded { amount_over } => {
                lines.push(format!("Validation: over budget by {:.2}", amount_over))
            }
            ValidationStatus::InfeasibleBudget { reason } => {
                lines.push(format!("Validation: rejected ({})", reason))
            }
        }

        let Some(plan) = &self.plan else {
            return lines.join("\n");
        };

        lines.push(String::new());
        lines.push("--- Selections ---".to_string());
        lines.push(format!(
            "Transport: {}",
            describe_choice(plan.transport.as_ref().map(|o| (o.id.as_str(), o.price)))
        ));
        lines.push(format!(
            "Accommodation: {} x {} nights",
            describe_choice(plan.accommodation.as_ref().map(|o| (o.id.as_str(), o.price))),
            plan.nights()
        ));
        for (idx, slot) in plan.activities.iter().enumerate() {
            lines.push(format!(
                "Night {}: {}",
                idx + 1,
                describe_choice(slot.as_ref().map(|o| (o.id.as_str(), o.price)))
            ));
        }

        lines.push(String::new());
        lines.push("--- Costs ---".to_string());
        for (category, amount) in &plan.cost_breakdown {
            lines.push(format!("{}: {:.2}", category, amount));
        }
        lines.push(format!(
            "Total: {:.2} of {:.2} ({})",
            plan.total_cost,
            plan.spec.total_budget,
            if plan.feasible { "feasible" } else { "infeasible" }
        ));

        if !plan.notes.is_empty() {
            lines.push(String::new());
            lines.push("--- Notes ---".to_string());
            for note in &plan.notes {
                lines.push(format!("- {}", note.describe()));
            }
        }

        lines.join("\n")
    }
}

/// One line of a budget sweep, flat enough for a CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub budget: f64,
    pub total_cost: Option<f64>,
    pub feasible: bool,
    pub transport: String,
    pub accommodation: String,
    /// Scheduled activity ids joined with `;`
    pub activities: String,
}

impl SweepRow {
    pub fn from_report(budget: f64, report: &PlanReport) -> Self {
        let Some(plan) = &report.plan else {
            return Self {
                budget,
                total_cost: None,
                feasible: false,
                transport: String::new(),
                accommodation: String::new(),
                activities: String::new(),
            };
        };

        let id_of = |option: Option<&TravelOption>| {
            option.map(|o| o.id.clone()).unwrap_or_default()
        };
        Self {
            budget,
            total_cost: Some(plan.total_cost),
            feasible: plan.feasible,
            transport: id_of(plan.transport.as_ref()),
            accommodation: id_of(plan.accommodation.as_ref()),
            activities: plan.scheduled_activity_ids().join(";"),
        }
    }
}

fn describe_choice(choice: Option<(&str, f64)>) -> String {
    match choice {
        Some((id, price)) => format!("{} ({:.2})", id, price),
        None => "unfilled".to_string(),
    }
}
