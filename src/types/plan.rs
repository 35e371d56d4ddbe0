use super::budget::BudgetSpec;
use super::disruption::TimeWindow;
use super::option::{Category, TravelOption};
use crate::error::ItineraryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A position in a plan that holds at most one option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "slot", rename_all = "snake_case")]
pub enum Slot {
    Transport,
    Accommodation,
    /// 1-based night the activity is scheduled for
    Activity { night: u32 },
}

impl Slot {
    pub fn category(&self) -> Category {
        match self {
            Slot::Transport => Category::Transport,
            Slot::Accommodation => Category::Accommodation,
            Slot::Activity { .. } => Category::Activity,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Transport => f.write_str("transport"),
            Slot::Accommodation => f.write_str("accommodation"),
            Slot::Activity { night } => write!(f, "activity (night {})", night),
        }
    }
}

/// Annotation explaining a decision, degradation or problem in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "note", rename_all = "snake_case")]
pub enum PlanNote {
    /// The catalog had nothing usable for this category; its slots are unfilled
    EmptyCategory { category: Category, detail: String },
    /// Nothing fit the soft cap, so the cheapest option was taken anyway
    CapFallback {
        category: Category,
        cap: f64,
        cost: f64,
    },
    BudgetExceeded { amount_over: f64 },
    Substituted {
        slot: Slot,
        removed: String,
        replacement: String,
        score: f64,
    },
    /// No compliant substitute existed; the slot was cleared
    UnresolvedDisruption { slot: Slot, reason: String },
    DelayAbsorbed { delay_minutes: u32, suggestion: String },
    WeatherAdvisory { window: TimeWindow, detail: String },
    /// Standing recommendation attached by an advisory event
    Advisory { name: String, recommendation: String },
}

impl PlanNote {
    /// Notes that mark the plan as degraded
    pub fn is_flag(&self) -> bool {
        matches!(
            self,
            PlanNote::EmptyCategory { .. }
                | PlanNote::BudgetExceeded { .. }
                | PlanNote::UnresolvedDisruption { .. }
        )
    }

    pub fn describe(&self) -> String {
        match self {
            PlanNote::EmptyCategory { category, detail } => {
                format!("no {} selected: {}", category, detail)
            }
            PlanNote::CapFallback {
                category,
                cap,
                cost,
            } => format!(
                "{} over soft cap: {:.2} > {:.2}, cheapest option used",
                category, cost, cap
            ),
            PlanNote::BudgetExceeded { amount_over } => {
                format!("over budget by {:.2}", amount_over)
            }
            PlanNote::Substituted {
                slot,
                removed,
                replacement,
                score,
            } => format!(
                "{}: replaced {} with {} (score {:.3})",
                slot, removed, replacement, score
            ),
            PlanNote::UnresolvedDisruption { slot, reason } => {
                format!("{}: unresolved, {}", slot, reason)
            }
            PlanNote::DelayAbsorbed {
                delay_minutes,
                suggestion,
            } => format!("{} minute delay absorbed: {}", delay_minutes, suggestion),
            PlanNote::WeatherAdvisory { window, detail } => {
                format!("weather advisory for {}: {}", window, detail)
            }
            PlanNote::Advisory {
                name,
                recommendation,
            } => format!("{} advisory: {}", name, recommendation),
        }
    }
}

/// How far a plan has moved away from another one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanDrift {
    pub changed_slots: usize,
    pub cost_delta: f64,
}

/// A complete itinerary proposal.
///
/// Plans are values: replanning builds a new `Plan` and leaves the previous
/// one untouched so the two can be compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub spec: BudgetSpec,
    pub transport: Option<TravelOption>,
    pub accommodation: Option<TravelOption>,
    /// One slot per night, `None` when nothing fit
    pub activities: Vec<Option<TravelOption>>,
    pub total_cost: f64,
    pub feasible: bool,
    pub cost_breakdown: BTreeMap<Category, f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<PlanNote>,
}

impl Plan {
    /// Build a plan from its selections, deriving every cost figure.
    ///
    /// Any stale `BudgetExceeded` note is dropped and recomputed.
    pub fn assemble(
        spec: BudgetSpec,
        transport: Option<TravelOption>,
        accommodation: Option<TravelOption>,
        activities: Vec<Option<TravelOption>>,
        mut notes: Vec<PlanNote>,
    ) -> Self {
        let transport_cost = transport.as_ref().map_or(0.0, |option| option.price);
        let accommodation_cost = accommodation
            .as_ref()
            .map_or(0.0, |option| option.price * f64::from(spec.nights));
        let activities_cost = activities
            .iter()
            .flatten()
            .fold(0.0, |sum, option| sum + option.price);

        let total_cost = transport_cost + accommodation_cost + activities_cost;
        let feasible = spec.fits(total_cost);

        let mut cost_breakdown = BTreeMap::new();
        cost_breakdown.insert(Category::Transport, transport_cost);
        cost_breakdown.insert(Category::Accommodation, accommodation_cost);
        cost_breakdown.insert(Category::Activity, activities_cost);

        notes.retain(|note| !matches!(note, PlanNote::BudgetExceeded { .. }));
        if !feasible {
            notes.push(PlanNote::BudgetExceeded {
                amount_over: total_cost - spec.total_budget,
            });
        }

        Self {
            spec,
            transport,
            accommodation,
            activities,
            total_cost,
            feasible,
            cost_breakdown,
            notes,
        }
    }

    pub fn nights(&self) -> u32 {
        self.spec.nights
    }

    pub fn transport_cost(&self) -> f64 {
        self.cost_of(Category::Transport)
    }

    pub fn accommodation_cost(&self) -> f64 {
        self.cost_of(Category::Accommodation)
    }

    pub fn activities_cost(&self) -> f64 {
        self.cost_of(Category::Activity)
    }

    fn cost_of(&self, category: Category) -> f64 {
        self.cost_breakdown.get(&category).copied().unwrap_or(0.0)
    }

    /// Money left under the total budget, never negative.
    pub fn slack(&self) -> f64 {
        (self.spec.total_budget - self.total_cost).max(0.0)
    }

    pub fn amount_over(&self) -> f64 {
        (self.total_cost - self.spec.total_budget).max(0.0)
    }

    /// Activity scheduled for a 1-based night
    pub fn activity(&self, night: u32) -> Option<&TravelOption> {
        let index = usize::try_from(night).ok()?.checked_sub(1)?;
        self.activities.get(index)?.as_ref()
    }

    pub fn option_at(&self, slot: Slot) -> Option<&TravelOption> {
        match slot {
            Slot::Transport => self.transport.as_ref(),
            Slot::Accommodation => self.accommodation.as_ref(),
            Slot::Activity { night } => self.activity(night),
        }
    }

    /// Every slot of the plan in a fixed order: transport, accommodation, nights.
    pub fn slots(&self) -> Vec<Slot> {
        let mut slots = vec![Slot::Transport, Slot::Accommodation];
        slots.extend((1..=self.activities.len() as u32).map(|night| Slot::Activity { night }));
        slots
    }

    pub fn scheduled_activity_ids(&self) -> Vec<&str> {
        self.activities
            .iter()
            .flatten()
            .map(|option| option.id.as_str())
            .collect()
    }

    pub fn value_score_sum(&self) -> f64 {
        self.transport
            .iter()
            .chain(self.accommodation.iter())
            .chain(self.activities.iter().flatten())
            .fold(0.0, |sum, option| sum + option.value_score)
    }

    /// New plan with `slot` set to `option`, all other slots unchanged.
    pub fn with_slot(&self, slot: Slot, option: Option<TravelOption>, note: Option<PlanNote>) -> Plan {
        let mut transport = self.transport.clone();
        let mut accommodation = self.accommodation.clone();
        let mut activities = self.activities.clone();

        match slot {
            Slot::Transport => transport = option.clone(),
            Slot::Accommodation => accommodation = option.clone(),
            Slot::Activity { night } => {
                if let Some(entry) = (night as usize)
                    .checked_sub(1)
                    .and_then(|index| activities.get_mut(index))
                {
                    *entry = option.clone();
                }
            }
        }

        let mut notes = self.notes.clone();
        if option.is_some() {
            notes.retain(|existing| {
                !matches!(existing, PlanNote::UnresolvedDisruption { slot: s, .. } if *s == slot)
            });
        }
        notes.extend(note);

        Plan::assemble(self.spec, transport, accommodation, activities, notes)
    }

    pub fn with_note(&self, note: PlanNote) -> Plan {
        let mut notes = self.notes.clone();
        notes.push(note);
        Plan::assemble(
            self.spec,
            self.transport.clone(),
            self.accommodation.clone(),
            self.activities.clone(),
            notes,
        )
    }

    /// Notes worth keeping when this plan is the base of a replan.
    pub fn carried_notes(&self) -> Vec<PlanNote> {
        self.notes
            .iter()
            .filter(|note| {
                matches!(
                    note,
                    PlanNote::EmptyCategory { .. }
                        | PlanNote::UnresolvedDisruption { .. }
                        | PlanNote::Advisory { .. }
                )
            })
            .cloned()
            .collect()
    }

    /// Copy of the plan whose notes are reset to the carried ones.
    pub fn successor(&self) -> Plan {
        Plan::assemble(
            self.spec,
            self.transport.clone(),
            self.accommodation.clone(),
            self.activities.clone(),
            self.carried_notes(),
        )
    }

    pub fn is_flagged(&self) -> bool {
        self.notes.iter().any(PlanNote::is_flag)
    }

    /// Flagged notes expressed as errors
    pub fn issues(&self) -> Vec<ItineraryError> {
        self.notes
            .iter()
            .filter_map(|note| match note {
                PlanNote::EmptyCategory { category, .. } => {
                    Some(ItineraryError::EmptyCategoryCatalog(*category))
                }
                PlanNote::BudgetExceeded { amount_over } => Some(ItineraryError::BudgetExceeded {
                    amount_over: *amount_over,
                }),
                PlanNote::UnresolvedDisruption { slot, reason } => Some(
                    ItineraryError::UnresolvedDisruption(format!("{}: {}", slot, reason)),
                ),
                _ => None,
            })
            .collect()
    }

    pub fn drift_from(&self, other: &Plan) -> PlanDrift {
        let longest = self.activities.len().max(other.activities.len()) as u32;
        let mut slots = vec![Slot::Transport, Slot::Accommodation];
        slots.extend((1..=longest).map(|night| Slot::Activity { night }));

        let changed_slots = slots
            .into_iter()
            .filter(|slot| {
                self.option_at(*slot).map(|o| o.id.as_str())
                    != other.option_at(*slot).map(|o| o.id.as_str())
            })
            .count();

        PlanDrift {
            changed_slots,
            cost_delta: self.total_cost - other.total_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Setting;

    fn sample_plan() -> Plan {
        Plan::assemble(
            BudgetSpec::new(25000.0, 2, 3),
            Some(TravelOption::transport("economy", "flight", 8000.0, 7.0)),
            Some(TravelOption::accommodation("inn", "guesthouse", 2000.0, 5.0)),
            vec![
                Some(TravelOption::activity(
                    "museum",
                    "museum",
                    1200.0,
                    7.0,
                    Setting::Indoor,
                )),
                Some(TravelOption::activity(
                    "cruise",
                    "boat",
                    1500.0,
                    6.0,
                    Setting::Outdoor,
                )),
                None,
            ],
            Vec::new(),
        )
    }

    #[test]
    fn test_assemble_costs() {
        let plan = sample_plan();
        assert_eq!(plan.transport_cost(), 8000.0);
        assert_eq!(plan.accommodation_cost(), 6000.0);
        assert_eq!(plan.activities_cost(), 2700.0);
        assert_eq!(plan.total_cost, 16700.0);
        assert!(plan.feasible);
        assert!(!plan.is_flagged());
    }

    #[test]
    fn test_over_budget_is_flagged() {
        let plan = sample_plan();
        let tight = Plan::assemble(
            BudgetSpec::new(15000.0, 2, 3),
            plan.transport.clone(),
            plan.accommodation.clone(),
            plan.activities.clone(),
            Vec::new(),
        );

        assert!(!tight.feasible);
        assert_eq!(tight.amount_over(), 1700.0);
        assert!(matches!(
            tight.issues().as_slice(),
            [ItineraryError::BudgetExceeded { .. }]
        ));
    }

    #[test]
    fn test_with_slot_leaves_others_untouched() {
        let plan = sample_plan();
        let replacement = TravelOption::activity("spa", "wellness", 900.0, 6.0, Setting::Indoor);
        let updated = plan.with_slot(Slot::Activity { night: 2 }, Some(replacement), None);

        assert_eq!(updated.activity(1), plan.activity(1));
        assert_eq!(updated.activity(3), None);
        assert_eq!(updated.activity(2).unwrap().id, "spa");
        assert_eq!(updated.total_cost, 16100.0);
        assert_eq!(plan.activity(2).unwrap().id, "cruise");

        let drift = updated.drift_from(&plan);
        assert_eq!(drift.changed_slots, 1);
        assert_eq!(drift.cost_delta, -600.0);
    }

    #[test]
    fn test_activity_lookup_bounds() {
        let plan = sample_plan();
        assert!(plan.activity(0).is_none());
        assert!(plan.activity(4).is_none());
        assert_eq!(plan.slots().len(), 5);
    }
}
