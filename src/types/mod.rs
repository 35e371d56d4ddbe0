pub mod advisory;
pub mod budget;
pub mod disruption;
pub mod option;
pub mod plan;
pub mod result;

pub use advisory::Advisory;
pub use budget::{Allocation, BudgetSpec};
pub use disruption::{Disruption, DisruptionTarget, Severity, TimeWindow};
pub use option::{Category, Setting, TravelOption};
pub use plan::{Plan, PlanDrift, PlanNote, Slot};
pub use result::{PlanReport, SweepRow, ValidationStatus};
