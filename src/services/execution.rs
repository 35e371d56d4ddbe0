use crate::{
    bus::{EventKind, ItineraryEvent},
    core::{agent::ItineraryAgent, steps::SessionStep},
    error::{ItineraryError, Result},
    types::{Advisory, BudgetSpec, Disruption, Plan, PlanNote, PlanReport, ValidationStatus},
};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

impl ItineraryAgent {
    /// Validate the request, plan, validate the plan and publish the outcome.
    ///
    /// Validation failures come back as reports, not errors; `Err` is reserved
    /// for the bus failing to accept the event.
    pub async fn create_plan(&mut self, spec: BudgetSpec) -> Result<PlanReport> {
        self.history_mut().add_step(SessionStep::Request { spec });

        if let Err(err) = self.validator().validate_initial(&spec) {
            return self.reject(err).await;
        }

        let plan = self.planner().plan(&spec, self.catalog());
        self.set_spec(spec);
        self.accept(plan, None, EventKind::PlanCreated).await
    }

    /// Replan the current plan around `disruption` and publish the result.
    pub async fn handle_disruption(&mut self, disruption: Disruption) -> Result<PlanReport> {
        let current = self
            .current_plan()
            .cloned()
            .ok_or_else(|| ItineraryError::NoActivePlan(self.session_id().to_string()))?;
        let spec = self.spec().copied().unwrap_or(current.spec);

        self.history_mut().add_step(SessionStep::Disruption {
            disruption: disruption.clone(),
        });

        let plan = self
            .replanner()
            .replan(&current, &spec, &disruption, self.catalog());
        self.accept(plan, Some(disruption), EventKind::PlanUpdated)
            .await
    }

    /// Re-plan from scratch for a new total budget, keeping party size and nights.
    ///
    /// A rejected budget leaves the current plan in place.
    pub async fn update_budget(&mut self, total_budget: f64) -> Result<PlanReport> {
        let spec = self
            .spec()
            .copied()
            .ok_or_else(|| ItineraryError::NoActivePlan(self.session_id().to_string()))?;
        let updated = spec.with_total_budget(total_budget);

        self.history_mut().add_step(SessionStep::BudgetChanged {
            from: spec.total_budget,
            to: total_budget,
        });

        if let Err(err) = self.validator().validate_initial(&updated) {
            return self.reject(err).await;
        }

        let plan = self.planner().plan(&updated, self.catalog());
        self.set_spec(updated);
        self.accept(plan, None, EventKind::PlanUpdated).await
    }

    /// Attach an advisory to the current plan and republish it.
    ///
    /// No slot changes. Repeating an advisory already on the plan does not
    /// duplicate the note.
    pub async fn handle_advisory(&mut self, advisory: Advisory) -> Result<PlanReport> {
        let current = self
            .current_plan()
            .cloned()
            .ok_or_else(|| ItineraryError::NoActivePlan(self.session_id().to_string()))?;

        info!(
            target: "itinerary::steps",
            "Session {} received advisory {}", self.session_id(), advisory.name
        );
        self.history_mut().add_step(SessionStep::Advisory {
            advisory: advisory.clone(),
        });

        let note = PlanNote::Advisory {
            name: advisory.name,
            recommendation: advisory.recommendation,
        };
        let plan = if current.notes.contains(&note) {
            current
        } else {
            current.with_note(note)
        };
        self.accept(plan, None, EventKind::PlanUpdated).await
    }

    /// Plan each budget in turn for the same party and trip length.
    ///
    /// Every budget goes through [`ItineraryAgent::create_plan`], so rejected
    /// budgets come back as rejected reports and the last one stays current.
    pub async fn plan_budgets(
        &mut self,
        budgets: &[f64],
        people_count: u32,
        nights: u32,
    ) -> Result<Vec<PlanReport>> {
        let mut reports = Vec::with_capacity(budgets.len());
        for budget in budgets {
            reports.push(
                self.create_plan(BudgetSpec::new(*budget, people_count, nights))
                    .await?,
            );
        }
        Ok(reports)
    }

    /// Handle disruptions strictly in arrival order until the sender side closes.
    ///
    /// Returns the agent so its history can be inspected afterwards.
    pub async fn run_disruptions(mut self, mut inbox: mpsc::Receiver<Disruption>) -> Self {
        while let Some(disruption) = inbox.recv().await {
            if let Err(err) = self.handle_disruption(disruption).await {
                error!(
                    target: "itinerary::steps",
                    "Session {} failed to handle disruption: {}",
                    self.session_id(),
                    err
                );
            }
        }
        info!(
            target: "itinerary::steps",
            "Session {} closed after {} disruption(s)",
            self.session_id(),
            self.history().disruption_count()
        );
        self
    }

    async fn accept(
        &mut self,
        plan: Plan,
        trigger: Option<Disruption>,
        kind: EventKind,
    ) -> Result<PlanReport> {
        let validation = match self.validator().validate_plan(&plan, &plan.spec) {
            Ok(()) => ValidationStatus::Valid,
            Err(err) => ValidationStatus::from_error(&err).ok_or(err)?,
        };

        let changed_slots = self
            .current_plan()
            .map(|previous| plan.drift_from(previous).changed_slots);
        let total_cost = plan.total_cost;
        let feasible = plan.feasible;
        let revision = self.history_mut().push_plan(plan.clone());

        let step = match (&trigger, changed_slots) {
            (Some(_), Some(changed_slots)) => SessionStep::Replanned {
                revision,
                total_cost,
                feasible,
                changed_slots,
            },
            _ => SessionStep::Planned {
                revision,
                total_cost,
                feasible,
            },
        };
        self.history_mut().add_step(step);

        let kind = if validation.is_valid() {
            kind
        } else {
            warn!(
                target: "itinerary::budget",
                "Plan #{} for session {} failed validation", revision, self.session_id()
            );
            EventKind::ValidationFailed
        };

        let report =
            PlanReport::accepted(self.session_id(), revision, plan, validation, trigger);
        self.publish(kind, &report).await?;
        Ok(report)
    }

    async fn reject(&mut self, err: ItineraryError) -> Result<PlanReport> {
        let reason = match err {
            ItineraryError::InfeasibleBudget(reason) => reason,
            other => return Err(other),
        };

        self.history_mut().add_step(SessionStep::Rejected {
            reason: reason.clone(),
        });
        let report = PlanReport::rejected(self.session_id(), reason);
        self.publish(EventKind::ValidationFailed, &report).await?;
        Ok(report)
    }

    async fn publish(&mut self, kind: EventKind, report: &PlanReport) -> Result<()> {
        let sequence = self.next_sequence();
        let event = ItineraryEvent {
            session_id: self.session_id().to_string(),
            sequence,
            kind,
            report: report.clone(),
        };

        self.publisher().publish(event).await?;
        self.history_mut()
            .add_step(SessionStep::Published { kind, sequence });
        Ok(())
    }
}
