use crate::{
    config::MIN_PER_PERSON_PER_NIGHT,
    error::{ItineraryError, Result},
    types::{BudgetSpec, Plan},
};
use tracing::debug;

/// Pure feasibility checks run before and after planning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetValidator {
    min_per_person_per_night: f64,
}

impl Default for BudgetValidator {
    fn default() -> Self {
        Self::new(MIN_PER_PERSON_PER_NIGHT)
    }
}

impl BudgetValidator {
    pub fn new(min_per_person_per_night: f64) -> Self {
        Self {
            min_per_person_per_night,
        }
    }

    pub fn min_per_person_per_night(&self) -> f64 {
        self.min_per_person_per_night
    }

    /// Reject a request that cannot be planned at all. Stops at the first failure.
    pub fn validate_initial(&self, spec: &BudgetSpec) -> Result<()> {
        if spec.people_count < 1 {
            return Err(ItineraryError::InfeasibleBudget(
                "people_count must be at least 1".to_string(),
            ));
        }
        if spec.nights < 1 {
            return Err(ItineraryError::InfeasibleBudget(
                "nights must be at least 1".to_string(),
            ));
        }
        if !spec.total_budget.is_finite() || spec.total_budget <= 0.0 {
            return Err(ItineraryError::InfeasibleBudget(format!(
                "total_budget must be a positive number, got {}",
                spec.total_budget
            )));
        }

        let per_person_per_night = spec.per_person_per_night();
        if per_person_per_night < self.min_per_person_per_night {
            return Err(ItineraryError::InfeasibleBudget(format!(
                "{:.2} per person per night is below the minimum of {:.2}",
                per_person_per_night, self.min_per_person_per_night
            )));
        }

        debug!(
            target: "itinerary::budget",
            "Request accepted: {:.2} per person per night", per_person_per_night
        );
        Ok(())
    }

    /// Check a finished plan against the budget it must respect.
    pub fn validate_plan(&self, plan: &Plan, spec: &BudgetSpec) -> Result<()> {
        if spec.fits(plan.total_cost) {
            return Ok(());
        }
        Err(ItineraryError::BudgetExceeded {
            amount_over: plan.total_cost - spec.total_budget,
        })
    }
}

/// [`BudgetValidator::validate_initial`] with the default floor
pub fn validate_initial(spec: &BudgetSpec) -> Result<()> {
    BudgetValidator::default().validate_initial(spec)
}

/// [`BudgetValidator::validate_plan`]
pub fn validate_plan(plan: &Plan, spec: &BudgetSpec) -> Result<()> {
    BudgetValidator::default().validate_plan(plan, spec)
}
