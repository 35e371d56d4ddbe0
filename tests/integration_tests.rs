use itinerary_agent::{
    types::{Category, PlanNote, Setting, Severity, Slot, TimeWindow},
    BudgetSpec, BudgetValidator, Disruption, Planner, Replanner, SampleCatalog, StaticCatalog,
    TravelOption,
};

fn reference_catalog() -> StaticCatalog {
    StaticCatalog::from_options([
        TravelOption::transport("economy", "flight", 8000.0, 7.0),
        TravelOption::transport("premium", "flight", 12000.0, 8.0),
        TravelOption::accommodation("acc_a", "guesthouse", 2000.0, 5.0),
        TravelOption::accommodation("acc_b", "hotel", 3500.0, 7.0),
        TravelOption::activity("outdoor", "hiking", 1500.0, 6.0, Setting::Outdoor),
        TravelOption::activity("indoor", "museum", 1200.0, 7.0, Setting::Indoor),
    ])
}

#[test]
fn test_reference_request_end_to_end() {
    let catalog = reference_catalog();
    let spec = BudgetSpec::new(25000.0, 2, 3);
    let validator = BudgetValidator::default();

    validator.validate_initial(&spec).unwrap();
    let plan = Planner::new().plan(&spec, &catalog);
    validator.validate_plan(&plan, &spec).unwrap();

    assert_eq!(plan.transport.as_ref().unwrap().price, 8000.0);
    assert_eq!(plan.accommodation_cost(), 6000.0);
    assert!(plan.total_cost <= spec.total_budget);
    assert!(plan.feasible);

    let alert = Disruption::outdoor_weather(TimeWindow::night(2), Severity::Moderate);
    let replanned = Replanner::default().replan(&plan, &spec, &alert, &catalog);

    assert_eq!(replanned.activity(2).unwrap().id, "indoor");
    assert_eq!(replanned.activities[0], plan.activities[0]);
    assert_eq!(replanned.activities[2], plan.activities[2]);
    assert_eq!(replanned.total_cost, plan.total_cost - 300.0);
    validator.validate_plan(&replanned, &spec).unwrap();
}

#[test]
fn test_cost_breakdown_adds_up() {
    let catalog = SampleCatalog::for_party(3);
    for budget in [12000.0, 20000.0, 45000.0, 90000.0] {
        let spec = BudgetSpec::new(budget, 3, 4);
        let plan = Planner::new().plan(&spec, &catalog);

        let transport = plan.transport.as_ref().map_or(0.0, |o| o.price);
        let accommodation = plan.accommodation.as_ref().map_or(0.0, |o| o.price * 4.0);
        let activities: f64 = plan.activities.iter().flatten().map(|o| o.price).sum();

        assert_eq!(transport + accommodation + activities, plan.total_cost);
        assert_eq!(plan.cost_breakdown[&Category::Activity], activities);
        assert_eq!(plan.feasible, plan.total_cost <= budget);
    }
}

#[test]
fn test_over_budget_is_always_flagged() {
    let catalog = SampleCatalog::for_party(4);
    let spec = BudgetSpec::new(7000.0, 4, 2);
    let plan = Planner::new().plan(&spec, &catalog);

    assert!(plan.total_cost > spec.total_budget);
    assert!(!plan.feasible);
    assert!(plan
        .notes
        .iter()
        .any(|note| matches!(note, PlanNote::BudgetExceeded { .. })));
    assert!(BudgetValidator::default()
        .validate_plan(&plan, &spec)
        .is_err());
}

#[test]
fn test_value_grows_with_budget_on_sample_catalog() {
    let catalog = SampleCatalog::for_party(1);
    let sums: Vec<f64> = [5000.0, 10000.0, 18000.0, 30000.0]
        .into_iter()
        .map(|budget| {
            Planner::new()
                .plan(&BudgetSpec::new(budget, 1, 2), &catalog)
                .value_score_sum()
        })
        .collect();

    assert_eq!(sums, vec![17.0, 21.0, 26.0, 29.0]);
}

#[test]
fn test_weather_leaves_other_slots_untouched() {
    let catalog = SampleCatalog::for_party(2);
    let spec = BudgetSpec::new(40000.0, 2, 3);
    let original = Planner::new().plan(&spec, &catalog);
    let alert = Disruption::outdoor_weather(TimeWindow::new(2, 3), Severity::Severe);

    let plan = Replanner::default().replan(&original, &spec, &alert, &catalog);

    assert_eq!(plan.transport, original.transport);
    assert_eq!(plan.accommodation, original.accommodation);
    assert_eq!(plan.activities[0], original.activities[0]);
    for night in 2..=3 {
        if let Some(option) = plan.option_at(Slot::Activity { night }) {
            assert!(option.is_indoor(), "night {} got {}", night, option.id);
        }
    }
}

#[test]
fn test_closure_of_everything_is_unresolved_not_dropped() {
    let catalog = reference_catalog();
    let spec = BudgetSpec::new(25000.0, 2, 3);
    let original = Planner::new().plan(&spec, &catalog);
    let closure = Disruption::closure(["indoor", "outdoor"], TimeWindow::night(1));

    let plan = Replanner::default().replan(&original, &spec, &closure, &catalog);

    assert!(plan.activity(1).is_none());
    assert_eq!(plan.activities[1], original.activities[1]);
    assert!(plan.notes.iter().any(|note| matches!(
        note,
        PlanNote::UnresolvedDisruption {
            slot: Slot::Activity { night: 1 },
            ..
        }
    )));
    assert_eq!(plan.issues().len(), 1);
}
