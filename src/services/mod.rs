//! Planning services and the coordinator's execution flow

pub mod budget;
pub mod execution;
pub mod planning;
pub mod replanning;
pub mod scoring;

pub use budget::{validate_initial, validate_plan, BudgetValidator};
pub use planning::Planner;
pub use replanning::Replanner;
pub use scoring::{ActivityScorer, ScoredCandidate, ScoringWeights};
