use itinerary_agent::{
    bus::FanoutPublisher,
    types::{Severity, TimeWindow},
    BudgetSpec, Disruption, DisruptionEnvelope, DisruptionRouter, EventKind, FileEventPublisher,
    ItineraryAgent, ItineraryError, ItineraryEvent, MemoryEventBus, SampleCatalog, SessionStep,
};
use std::sync::Arc;
use tempfile::tempdir;

fn agent(session: &str, people: u32, bus: Arc<MemoryEventBus>) -> ItineraryAgent {
    ItineraryAgent::new(Arc::new(SampleCatalog::for_party(people)), bus).with_session_id(session)
}

#[tokio::test]
async fn test_router_keeps_per_session_order() {
    let bus = Arc::new(MemoryEventBus::new(64));

    let mut alpha = agent("alpha", 1, bus.clone());
    alpha
        .create_plan(BudgetSpec::new(18000.0, 1, 2))
        .await
        .unwrap();
    let mut beta = agent("beta", 2, bus.clone());
    beta.create_plan(BudgetSpec::new(40000.0, 2, 3))
        .await
        .unwrap();

    let mut router = DisruptionRouter::new(8);
    router.register(alpha).unwrap();
    router.register(beta).unwrap();
    assert_eq!(router.session_ids(), vec!["alpha", "beta"]);

    router
        .route(DisruptionEnvelope::new(
            "alpha",
            Disruption::outdoor_weather(TimeWindow::night(1), Severity::Severe),
        ))
        .await
        .unwrap();
    router
        .route(DisruptionEnvelope::new("beta", Disruption::transport_delay(30, 3)))
        .await
        .unwrap();
    router
        .route(DisruptionEnvelope::new(
            "alpha",
            Disruption::outdoor_weather(TimeWindow::night(2), Severity::Severe),
        ))
        .await
        .unwrap();

    let agents = router.shutdown().await.unwrap();
    assert_eq!(agents.len(), 2);

    let alpha = &agents[0];
    assert_eq!(alpha.session_id(), "alpha");
    assert_eq!(alpha.history().disruption_count(), 2);
    assert_eq!(alpha.history().revision_count(), 3);
    let current = alpha.current_plan().unwrap();
    assert!(current.activities.iter().flatten().all(|o| o.is_indoor()));

    let sequences: Vec<u64> = bus
        .session_snapshot("alpha")
        .iter()
        .map(|event| event.sequence)
        .collect();
    assert_eq!(sequences, vec![1, 2, 3]);
    assert_eq!(bus.session_snapshot("beta").len(), 2);
}

#[tokio::test]
async fn test_unknown_session_rejected() {
    let router = DisruptionRouter::new(4);
    let err = router
        .route(DisruptionEnvelope::new("ghost", Disruption::transport_delay(10, 1)))
        .await
        .unwrap_err();

    assert!(matches!(err, ItineraryError::UnknownSession(ref id) if id == "ghost"));
    assert_eq!(err.error_code(), "UNKNOWN_SESSION");
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let bus = Arc::new(MemoryEventBus::default());
    let mut router = DisruptionRouter::new(4);
    router.register(agent("same", 1, bus.clone())).unwrap();

    let err = router.register(agent("same", 1, bus)).unwrap_err();
    assert_eq!(err.error_code(), "BUS_ERROR");
    router.shutdown().await.unwrap();
}

#[test]
fn test_events_written_as_json_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let bus = Arc::new(MemoryEventBus::default());
    let publisher = FanoutPublisher::new()
        .with_target(bus.clone())
        .with_target(Arc::new(FileEventPublisher::new(&path).unwrap()));
    let mut agent = ItineraryAgent::new(Arc::new(SampleCatalog::for_party(1)), Arc::new(publisher))
        .with_session_id("file-session");

    tokio_test::block_on(async {
        agent
            .create_plan(BudgetSpec::new(14000.0, 1, 2))
            .await
            .unwrap();
        agent
            .handle_disruption(Disruption::closure(["guesthouse"], TimeWindow::whole_trip(2)))
            .await
            .unwrap();
    });

    let content = std::fs::read_to_string(&path).unwrap();
    let events: Vec<ItineraryEvent> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EventKind::PlanCreated);
    assert_eq!(events[1].kind, EventKind::PlanUpdated);
    assert_eq!(events[1].sequence, 2);
    let plan = events[1].report.plan.as_ref().unwrap();
    assert_eq!(plan.accommodation.as_ref().unwrap().id, "hostel");
    assert!(plan.feasible);
    assert_eq!(bus.snapshot().len(), 2);
}

#[test]
fn test_over_budget_plan_publishes_validation_failed() {
    let bus = Arc::new(MemoryEventBus::default());
    let mut agent = agent("tight", 4, bus.clone());

    let report = tokio_test::block_on(agent.create_plan(BudgetSpec::new(5000.0, 4, 1))).unwrap();
    assert!(report.plan.is_some());
    assert!(!report.is_success());
    assert_eq!(bus.snapshot()[0].kind, EventKind::ValidationFailed);

    let steps = agent.history().steps();
    assert!(matches!(steps[0], SessionStep::Request { .. }));
    assert!(matches!(
        steps.last(),
        Some(SessionStep::Published {
            kind: EventKind::ValidationFailed,
            ..
        })
    ));
}
