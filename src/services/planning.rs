use crate::{
    catalog::CatalogProvider,
    types::{BudgetSpec, Category, Plan, PlanNote, TravelOption},
};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

/// Initial budget allocation and option selection.
///
/// Selection runs strictly in sequence: transport against its soft cap,
/// accommodation against its soft cap, then activities against whatever
/// money is actually left, so unused capacity rolls over to activities.
#[derive(Debug, Clone, Copy, Default)]
pub struct Planner;

impl Planner {
    pub fn new() -> Self {
        Self
    }

    /// Build a best-effort plan. Never fails; feasibility is recorded on the plan.
    pub fn plan(&self, spec: &BudgetSpec, catalog: &dyn CatalogProvider) -> Plan {
        let allocation = spec.allocation();
        let nights = spec.nights;
        let mut notes = Vec::new();

        let transport = fetch(catalog, Category::Transport, &mut notes).and_then(|options| {
            select_within_cap(
                &options,
                allocation.transport_cap,
                1.0,
                Category::Transport,
                &mut notes,
            )
        });

        let accommodation =
            fetch(catalog, Category::Accommodation, &mut notes).and_then(|options| {
                select_within_cap(
                    &options,
                    allocation.accommodation_cap,
                    f64::from(nights),
                    Category::Accommodation,
                    &mut notes,
                )
            });

        let committed = transport.as_ref().map_or(0.0, |option| option.price)
            + accommodation
                .as_ref()
                .map_or(0.0, |option| option.price * f64::from(nights));
        let remaining = spec.total_budget - committed;

        debug!(
            target: "itinerary::planner",
            "Activity budget {:.2} (static cap {:.2})",
            remaining,
            allocation.activity_cap
        );

        let activities = match fetch(catalog, Category::Activity, &mut notes) {
            Some(options) => select_activities(&options, remaining, nights),
            None => vec![None; nights as usize],
        };

        let plan = Plan::assemble(*spec, transport, accommodation, activities, notes);
        info!(
            target: "itinerary::planner",
            "Planned itinerary: total_cost={:.2} budget={:.2} feasible={}",
            plan.total_cost,
            spec.total_budget,
            plan.feasible
        );
        plan
    }
}

/// Options in preference order: highest value first, then cheapest, then catalog order.
pub fn rank_by_value(options: &[TravelOption]) -> Vec<&TravelOption> {
    let mut ranked: Vec<&TravelOption> = options.iter().collect();
    ranked.sort_by(|a, b| compare_by_value(a, b));
    ranked
}

fn compare_by_value(a: &TravelOption, b: &TravelOption) -> Ordering {
    b.value_score
        .total_cmp(&a.value_score)
        .then_with(|| a.price.total_cmp(&b.price))
}

/// Pick one activity per night from a running balance, never repeating an id.
///
/// A night with nothing affordable stays unfilled.
pub fn select_activities(
    options: &[TravelOption],
    budget: f64,
    nights: u32,
) -> Vec<Option<TravelOption>> {
    let ranked = rank_by_value(options);
    let mut balance = budget;
    let mut used: Vec<&str> = Vec::new();
    let mut slots = Vec::with_capacity(nights as usize);

    for night in 1..=nights {
        let pick = ranked
            .iter()
            .copied()
            .find(|option| !used.contains(&option.id.as_str()) && option.price <= balance);

        match pick {
            Some(option) => {
                balance -= option.price;
                used.push(option.id.as_str());
                slots.push(Some(option.clone()));
            }
            None => {
                debug!(
                    target: "itinerary::planner",
                    "Night {} left unfilled, balance {:.2}", night, balance
                );
                slots.push(None);
            }
        }
    }

    slots
}

fn fetch(
    catalog: &dyn CatalogProvider,
    category: Category,
    notes: &mut Vec<PlanNote>,
) -> Option<Vec<TravelOption>> {
    match catalog.options_for(category) {
        Ok(options) if !options.is_empty() => Some(options),
        Ok(_) => {
            warn!(target: "itinerary::planner", "Catalog has no {} options", category);
            notes.push(PlanNote::EmptyCategory {
                category,
                detail: "catalog returned no options".to_string(),
            });
            None
        }
        Err(err) => {
            warn!(target: "itinerary::planner", "Catalog lookup for {} failed: {}", category, err);
            notes.push(PlanNote::EmptyCategory {
                category,
                detail: err.to_string(),
            });
            None
        }
    }
}

/// Best-valued option whose cost fits the cap, else the cheapest one.
fn select_within_cap(
    options: &[TravelOption],
    cap: f64,
    multiplier: f64,
    category: Category,
    notes: &mut Vec<PlanNote>,
) -> Option<TravelOption> {
    if let Some(option) = rank_by_value(options)
        .into_iter()
        .find(|option| option.price * multiplier <= cap)
    {
        return Some(option.clone());
    }

    let cheapest = options
        .iter()
        .min_by(|a, b| a.price.total_cmp(&b.price))?;
    let cost = cheapest.price * multiplier;

    debug!(
        target: "itinerary::planner",
        "No {} fits cap {:.2}; falling back to {} at {:.2}",
        category,
        cap,
        cheapest.id,
        cost
    );
    notes.push(PlanNote::CapFallback {
        category,
        cap,
        cost,
    });
    Some(cheapest.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SampleCatalog, StaticCatalog};
    use crate::types::Setting;

    fn reference_catalog() -> StaticCatalog {
        StaticCatalog::from_options([
            TravelOption::transport("economy", "flight", 8000.0, 7.0),
            TravelOption::transport("premium", "flight", 12000.0, 8.0),
            TravelOption::accommodation("inn", "guesthouse", 2000.0, 5.0),
            TravelOption::accommodation("hotel", "hotel", 3500.0, 7.0),
            TravelOption::activity("cruise", "boat", 1500.0, 6.0, Setting::Outdoor),
            TravelOption::activity("museum", "museum", 1200.0, 7.0, Setting::Indoor),
        ])
    }

    #[test]
    fn test_reference_plan() {
        let spec = BudgetSpec::new(25000.0, 2, 3);
        let plan = Planner::new().plan(&spec, &reference_catalog());

        assert_eq!(plan.transport.as_ref().unwrap().id, "economy");
        assert_eq!(plan.accommodation.as_ref().unwrap().id, "inn");
        assert_eq!(plan.accommodation_cost(), 6000.0);
        assert_eq!(plan.activity(1).unwrap().id, "museum");
        assert_eq!(plan.activity(2).unwrap().id, "cruise");
        assert!(plan.activity(3).is_none());
        assert_eq!(plan.total_cost, 16700.0);
        assert!(plan.feasible);
        assert!(plan.notes.is_empty());
    }

    #[test]
    fn test_cap_fallback_takes_cheapest() {
        let spec = BudgetSpec::new(5000.0, 1, 1);
        let plan = Planner::new().plan(&spec, &reference_catalog());

        assert_eq!(plan.transport.as_ref().unwrap().id, "economy");
        assert!(!plan.feasible);
        assert!(plan
            .notes
            .iter()
            .any(|note| matches!(note, PlanNote::CapFallback { category: Category::Transport, .. })));
        assert!(plan
            .notes
            .iter()
            .any(|note| matches!(note, PlanNote::BudgetExceeded { .. })));
    }

    #[test]
    fn test_empty_category_degrades_slot() {
        let catalog = StaticCatalog::from_options([
            TravelOption::transport("bus", "road", 1500.0, 3.0),
            TravelOption::accommodation("hostel", "lodging", 1000.0, 3.0),
        ]);
        let plan = Planner::new().plan(&BudgetSpec::new(10000.0, 1, 2), &catalog);

        assert_eq!(plan.activities, vec![None, None]);
        assert!(plan.feasible);
        assert!(plan.is_flagged());
        assert!(plan.notes.iter().any(|note| matches!(
            note,
            PlanNote::EmptyCategory {
                category: Category::Activity,
                ..
            }
        )));
    }

    #[test]
    fn test_tie_break_prefers_cheaper_then_catalog_order() {
        let options = vec![
            TravelOption::activity("a", "tour", 900.0, 5.0, Setting::Indoor),
            TravelOption::activity("b", "tour", 700.0, 5.0, Setting::Indoor),
            TravelOption::activity("c", "tour", 700.0, 5.0, Setting::Indoor),
        ];
        let ranked: Vec<&str> = rank_by_value(&options)
            .iter()
            .map(|o| o.id.as_str())
            .collect();
        assert_eq!(ranked, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_activities_use_rolled_over_budget() {
        let options = vec![
            TravelOption::activity("big", "show", 4000.0, 9.0, Setting::Indoor),
            TravelOption::activity("small", "walk", 100.0, 2.0, Setting::Outdoor),
        ];
        let slots = select_activities(&options, 4100.0, 3);

        assert_eq!(slots[0].as_ref().unwrap().id, "big");
        assert_eq!(slots[1].as_ref().unwrap().id, "small");
        assert!(slots[2].is_none());
    }

    #[test]
    fn test_sample_budget_sweep() {
        let catalog = SampleCatalog::for_party(1);
        let planner = Planner::new();

        let low = planner.plan(&BudgetSpec::new(5000.0, 1, 2), &catalog);
        assert_eq!(low.transport.as_ref().unwrap().id, "road_bus");
        assert_eq!(low.accommodation.as_ref().unwrap().id, "hostel");
        assert_eq!(low.scheduled_activity_ids(), vec!["food_tour", "beach_visit"]);
        assert_eq!(low.total_cost, 5000.0);

        let mid = planner.plan(&BudgetSpec::new(18000.0, 1, 2), &catalog);
        assert_eq!(mid.transport.as_ref().unwrap().id, "road_car");
        assert_eq!(mid.accommodation.as_ref().unwrap().id, "guesthouse");
        assert_eq!(mid.scheduled_activity_ids(), vec!["water_sports", "boat_cruise"]);
        assert_eq!(mid.total_cost, 14000.0);

        let high = planner.plan(&BudgetSpec::new(30000.0, 1, 2), &catalog);
        assert_eq!(high.transport.as_ref().unwrap().id, "flight_premium");
        assert_eq!(high.total_cost, 22000.0);
        assert!(high.feasible);
    }
}
