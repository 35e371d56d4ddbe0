use serde::{Deserialize, Serialize};

/// Share of the total budget initially reserved for transport.
pub const TRANSPORT_SHARE: f64 = 0.40;
/// Share of the total budget initially reserved for accommodation.
pub const ACCOMMODATION_SHARE: f64 = 0.40;
/// Share of the total budget initially reserved for activities.
pub const ACTIVITY_SHARE: f64 = 0.20;

/// Relative slack allowed when comparing costs against a budget.
pub const BUDGET_EPSILON: f64 = 1e-6;

/// What the traveller asked for: money, party size and trip length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetSpec {
    pub total_budget: f64,
    pub people_count: u32,
    pub nights: u32,
}

impl BudgetSpec {
    pub fn new(total_budget: f64, people_count: u32, nights: u32) -> Self {
        Self {
            total_budget,
            people_count,
            nights,
        }
    }

    /// Budget available per person per night. Zero when either divisor is zero.
    pub fn per_person_per_night(&self) -> f64 {
        let divisor = f64::from(self.people_count) * f64::from(self.nights);
        if divisor == 0.0 {
            0.0
        } else {
            self.total_budget / divisor
        }
    }

    pub fn allocation(&self) -> Allocation {
        Allocation::from_spec(self)
    }

    pub fn with_total_budget(mut self, total_budget: f64) -> Self {
        self.total_budget = total_budget;
        self
    }

    /// Whether `cost` stays within the total budget, allowing for float noise.
    pub fn fits(&self, cost: f64) -> bool {
        cost <= self.total_budget * (1.0 + BUDGET_EPSILON)
    }
}

/// Soft per-category caps derived from a [`BudgetSpec`].
///
/// The caps only steer the initial selection; the hard limit is always the
/// total budget, so capacity a category leaves unused rolls over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub transport_cap: f64,
    pub accommodation_cap: f64,
    pub activity_cap: f64,
}

impl Allocation {
    pub fn from_spec(spec: &BudgetSpec) -> Self {
        Self {
            transport_cap: TRANSPORT_SHARE * spec.total_budget,
            accommodation_cap: ACCOMMODATION_SHARE * spec.total_budget,
            activity_cap: ACTIVITY_SHARE * spec.total_budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_caps() {
        let allocation = BudgetSpec::new(25000.0, 2, 3).allocation();
        assert_eq!(allocation.transport_cap, 10000.0);
        assert_eq!(allocation.accommodation_cap, 10000.0);
        assert_eq!(allocation.activity_cap, 5000.0);
    }

    #[test]
    fn test_fits_tolerates_float_noise() {
        let spec = BudgetSpec::new(10000.0, 1, 1);
        assert!(spec.fits(10000.0));
        assert!(spec.fits(10000.000_001));
        assert!(!spec.fits(10000.1));
    }

    #[test]
    fn test_per_person_per_night() {
        assert_eq!(BudgetSpec::new(12000.0, 2, 3).per_person_per_night(), 2000.0);
        assert_eq!(BudgetSpec::new(12000.0, 0, 3).per_person_per_night(), 0.0);
    }
}
