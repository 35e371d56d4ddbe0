use super::steps::SessionStep;
use crate::types::{Plan, PlanDrift};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Ordered plan history of one session: the original plan, then one plan per
/// accepted change, plus the step log that produced them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanHistory {
    plans: Vec<Plan>,
    steps: Vec<SessionStep>,
}

impl PlanHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step to the log
    pub fn add_step(&mut self, step: SessionStep) {
        let description = step.describe();
        info!(target: "itinerary::steps", "{}", description);
        self.steps.push(step);
    }

    /// Record a plan, returning its revision number
    pub fn push_plan(&mut self, plan: Plan) -> usize {
        self.plans.push(plan);
        self.plans.len() - 1
    }

    pub fn steps(&self) -> &[SessionStep] {
        &self.steps
    }

    pub fn last_step(&self) -> Option<&SessionStep> {
        self.steps.last()
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn original(&self) -> Option<&Plan> {
        self.plans.first()
    }

    pub fn current(&self) -> Option<&Plan> {
        self.plans.last()
    }

    pub fn revision_count(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Disruptions handled this session
    pub fn disruption_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, SessionStep::Disruption { .. }))
            .count()
    }

    /// Total drift of the current plan from the original one
    pub fn drift(&self) -> PlanDrift {
        match (self.current(), self.original()) {
            (Some(current), Some(original)) => current.drift_from(original),
            _ => PlanDrift::default(),
        }
    }
}
