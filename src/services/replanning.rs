use super::{
    budget::BudgetValidator,
    planning::Planner,
    scoring::{ActivityScorer, ScoredCandidate},
};
use crate::{
    catalog::CatalogProvider,
    config::PlanningConfig,
    types::{BudgetSpec, Category, Disruption, DisruptionTarget, Plan, PlanNote, Slot, TravelOption},
};
use tracing::{debug, info, warn};

/// Adjusts an accepted plan in response to a disruption.
///
/// Only slots implicated by the disruption change; every other slot is carried
/// over from the original plan as-is.
#[derive(Debug, Clone, Default)]
pub struct Replanner {
    config: PlanningConfig,
    planner: Planner,
    scorer: ActivityScorer,
    validator: BudgetValidator,
}

impl Replanner {
    pub fn new(config: PlanningConfig) -> Self {
        Self {
            scorer: ActivityScorer::new(config.scoring.clone()),
            validator: BudgetValidator::new(config.min_per_person_per_night),
            planner: Planner::new(),
            config,
        }
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    pub fn scorer(&self) -> &ActivityScorer {
        &self.scorer
    }

    /// Produce the plan that replaces `original` after `disruption`.
    ///
    /// Never fails: anything that cannot be resolved is recorded on the
    /// returned plan as a flag.
    pub fn replan(
        &self,
        original: &Plan,
        spec: &BudgetSpec,
        disruption: &Disruption,
        catalog: &dyn CatalogProvider,
    ) -> Plan {
        info!(target: "itinerary::replanner", "Replanning for {}", disruption);

        let base = self.base_plan(original, spec, catalog);
        let plan = match disruption {
            Disruption::WeatherAlert { .. } => self.handle_weather(base, spec, disruption, catalog),
            Disruption::DelayEvent { delay_minutes, .. } => {
                self.handle_delay(base, spec, disruption, *delay_minutes, catalog)
            }
            Disruption::ClosureEvent { .. } => self.handle_closure(base, spec, disruption, catalog),
        };

        info!(
            target: "itinerary::replanner",
            "Replanned: total_cost={:.2} feasible={} changed_slots={}",
            plan.total_cost,
            plan.feasible,
            plan.drift_from(original).changed_slots
        );
        plan
    }

    /// The plan disruptions are applied to. Falls back to a fresh allocation
    /// when the trip shape no longer matches the original plan.
    fn base_plan(&self, original: &Plan, spec: &BudgetSpec, catalog: &dyn CatalogProvider) -> Plan {
        if original.spec == *spec {
            return original.successor();
        }
        if original.spec.nights == spec.nights && original.spec.people_count == spec.people_count {
            return Plan::assemble(
                *spec,
                original.transport.clone(),
                original.accommodation.clone(),
                original.activities.clone(),
                original.carried_notes(),
            );
        }

        warn!(
            target: "itinerary::replanner",
            "Trip shape changed ({} nights -> {}), re-allocating from scratch",
            original.spec.nights,
            spec.nights
        );
        self.planner.plan(spec, catalog)
    }

    fn handle_weather(
        &self,
        base: Plan,
        spec: &BudgetSpec,
        disruption: &Disruption,
        catalog: &dyn CatalogProvider,
    ) -> Plan {
        let window = disruption.window();

        if !disruption.is_outdoor_weather() {
            return base.with_note(PlanNote::WeatherAdvisory {
                window,
                detail: "no outdoor impact, schedule unchanged".to_string(),
            });
        }

        let affected: Vec<(u32, TravelOption)> = (1..=base.nights())
            .filter(|night| window.contains(*night))
            .filter_map(|night| base.activity(night).map(|option| (night, option.clone())))
            .filter(|(_, option)| option.is_outdoor() && disruption.target().matches(option))
            .collect();

        if affected.is_empty() {
            return base.with_note(PlanNote::WeatherAdvisory {
                window,
                detail: "no outdoor activities scheduled in the window".to_string(),
            });
        }

        let candidates = match catalog.activity_options() {
            Ok(options) => options,
            Err(err) => {
                warn!(target: "itinerary::replanner", "Activity catalog unavailable: {}", err);
                Vec::new()
            }
        };

        affected.into_iter().fold(base, |plan, (night, removed)| {
            self.substitute(plan, spec, Slot::Activity { night }, &removed, &candidates, disruption)
        })
    }

    fn handle_closure(
        &self,
        base: Plan,
        spec: &BudgetSpec,
        disruption: &Disruption,
        catalog: &dyn CatalogProvider,
    ) -> Plan {
        let window = disruption.window();
        let target = disruption.target();

        let closed: Vec<(Slot, TravelOption)> = base
            .slots()
            .into_iter()
            .filter(|slot| match slot {
                Slot::Activity { night } => window.contains(*night),
                Slot::Transport | Slot::Accommodation => true,
            })
            .filter_map(|slot| base.option_at(slot).map(|option| (slot, option.clone())))
            .filter(|(_, option)| target.matches(option))
            .collect();

        if closed.is_empty() {
            debug!(target: "itinerary::replanner", "Closure touches no scheduled option");
            return base;
        }

        closed.into_iter().fold(base, |plan, (slot, removed)| {
            let candidates: Vec<TravelOption> = match catalog.options_for(slot.category()) {
                Ok(options) => options
                    .into_iter()
                    .filter(|option| !target.matches(option))
                    .collect(),
                Err(err) => {
                    warn!(target: "itinerary::replanner", "{} catalog unavailable: {}", slot.category(), err);
                    Vec::new()
                }
            };
            self.substitute(plan, spec, slot, &removed, &candidates, disruption)
        })
    }

    fn handle_delay(
        &self,
        base: Plan,
        spec: &BudgetSpec,
        disruption: &Disruption,
        delay_minutes: u32,
        catalog: &dyn CatalogProvider,
    ) -> Plan {
        let current = match &base.transport {
            Some(transport) if targets_transport(disruption.target(), transport) => transport.clone(),
            _ => {
                return base.with_note(PlanNote::DelayAbsorbed {
                    delay_minutes,
                    suggestion: "activities shift later, no cost change".to_string(),
                });
            }
        };

        let ceiling = spec.allocation().transport_cap * (1.0 + self.config.delay_cap_margin);
        let mut faster: Vec<TravelOption> = match (catalog.transport_options(), current.duration_hours) {
            (Ok(options), Some(current_hours)) => options
                .into_iter()
                .filter(|option| option.id != current.id && option.price <= ceiling)
                .filter(|option| option.duration_hours.is_some_and(|hours| hours < current_hours))
                .collect(),
            (Err(err), _) => {
                warn!(target: "itinerary::replanner", "Transport catalog unavailable: {}", err);
                Vec::new()
            }
            (Ok(_), None) => Vec::new(),
        };

        faster.sort_by(|a, b| {
            let hours = |option: &TravelOption| option.duration_hours.unwrap_or(f64::INFINITY);
            hours(a)
                .total_cmp(&hours(b))
                .then_with(|| b.value_score.total_cmp(&a.value_score))
                .then_with(|| a.price.total_cmp(&b.price))
        });

        for option in faster {
            let note = PlanNote::Substituted {
                slot: Slot::Transport,
                removed: current.id.clone(),
                replacement: option.id.clone(),
                score: self.scorer.score(&current, &option, false),
            };
            let trial = base.with_slot(Slot::Transport, Some(option), Some(note));
            if self.validator.validate_plan(&trial, spec).is_ok() {
                info!(target: "itinerary::replanner", "Switched to faster transport after {} minute delay", delay_minutes);
                return trial;
            }
        }

        let suggestion = self.delay_suggestion(&base, delay_minutes);
        debug!(target: "itinerary::replanner", "Delay absorbed: {}", suggestion);
        base.with_note(PlanNote::DelayAbsorbed {
            delay_minutes,
            suggestion,
        })
    }

    fn delay_suggestion(&self, plan: &Plan, delay_minutes: u32) -> String {
        if delay_minutes < self.config.long_delay_minutes {
            return format!("keep {}, activities shift later", transport_label(plan));
        }

        match &plan.accommodation {
            Some(stay) if stay.price <= plan.slack() => format!(
                "add an extra night at {} for {:.2} ({:.2} unspent)",
                stay.id,
                stay.price,
                plan.slack()
            ),
            Some(stay) => format!(
                "reschedule: an extra night at {} costs {:.2} but only {:.2} is unspent",
                stay.id,
                stay.price,
                plan.slack()
            ),
            None => "reschedule: no accommodation to extend".to_string(),
        }
    }

    /// Replace one slot with the best compliant candidate that keeps the plan
    /// within budget, else the cheapest compliant one, else clear the slot.
    ///
    /// Options already scheduled on another night are tried only after every
    /// unscheduled one.
    fn substitute(
        &self,
        plan: Plan,
        spec: &BudgetSpec,
        slot: Slot,
        removed: &TravelOption,
        candidates: &[TravelOption],
        disruption: &Disruption,
    ) -> Plan {
        let ranked = self.scorer.score_candidates(removed, candidates, disruption);
        let pool = prefer_unscheduled(&plan, slot, ranked);

        if pool.is_empty() {
            warn!(target: "itinerary::replanner", "{}: no compliant substitute for {}", slot, removed.id);
            return plan.with_slot(
                slot,
                None,
                Some(PlanNote::UnresolvedDisruption {
                    slot,
                    reason: format!("no compliant substitute for {}", removed.id),
                }),
            );
        }

        let substituted = |candidate: &ScoredCandidate| {
            plan.with_slot(
                slot,
                Some(candidate.option.clone()),
                Some(PlanNote::Substituted {
                    slot,
                    removed: removed.id.clone(),
                    replacement: candidate.option.id.clone(),
                    score: candidate.score,
                }),
            )
        };

        for candidate in &pool {
            let trial = substituted(candidate);
            if self.validator.validate_plan(&trial, spec).is_ok() {
                debug!(
                    target: "itinerary::replanner",
                    "{}: {} -> {} (score {:.3})",
                    slot,
                    removed.id,
                    candidate.option.id,
                    candidate.score
                );
                return trial;
            }
        }

        // Nothing keeps the plan in budget: take the cheapest and let the plan carry the flag.
        let mut cheapest = &pool[0];
        for candidate in &pool[1..] {
            if candidate.option.price < cheapest.option.price {
                cheapest = candidate;
            }
        }
        warn!(
            target: "itinerary::replanner",
            "{}: no substitute fits the budget, using cheapest {}",
            slot,
            cheapest.option.id
        );
        substituted(cheapest)
    }
}

/// Candidates in rank order, those not scheduled in another activity slot
/// first and repeats after them.
fn prefer_unscheduled(plan: &Plan, slot: Slot, ranked: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    let Slot::Activity { night } = slot else {
        return ranked;
    };

    let elsewhere: Vec<&str> = plan
        .activities
        .iter()
        .enumerate()
        .filter(|(index, _)| *index as u32 + 1 != night)
        .filter_map(|(_, option)| option.as_ref().map(|o| o.id.as_str()))
        .collect();

    let (mut pool, repeats): (Vec<_>, Vec<_>) = ranked
        .into_iter()
        .partition(|candidate| !elsewhere.contains(&candidate.option.id.as_str()));
    pool.extend(repeats);
    pool
}

fn targets_transport(target: &DisruptionTarget, transport: &TravelOption) -> bool {
    match target {
        DisruptionTarget::Category(category) => *category == Category::Transport,
        DisruptionTarget::Options(_) => target.matches(transport),
    }
}

fn transport_label(plan: &Plan) -> &str {
    plan.transport
        .as_ref()
        .map_or("the current schedule", |transport| transport.id.as_str())
}
