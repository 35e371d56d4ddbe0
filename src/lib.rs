//! itinerary-agent: budget-constrained travel itinerary planning with
//! disruption-aware replanning
//!
//! A session validates a request against a per-person-per-night floor, builds a
//! plan with soft category caps that roll unused money over to activities, and
//! then keeps that plan valid as weather alerts, delays and closures arrive.
//! Every outcome is published to a message bus as a structured report.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use itinerary_agent::{BudgetSpec, ItineraryAgent, MemoryEventBus, SampleCatalog};
//! use itinerary_agent::types::{Disruption, Severity, TimeWindow};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus = Arc::new(MemoryEventBus::default());
//!     let mut agent = ItineraryAgent::new(Arc::new(SampleCatalog::for_party(2)), bus.clone());
//!
//!     let report = agent.create_plan(BudgetSpec::new(25000.0, 2, 3)).await?;
//!     println!("{}", report.summary());
//!
//!     let alert = Disruption::outdoor_weather(TimeWindow::night(2), Severity::Severe);
//!     let replanned = agent.handle_disruption(alert).await?;
//!     println!("{}", replanned.summary());
//!     Ok(())
//! }
//! ```

pub mod bus;
pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod schemas;
pub mod services;
pub mod types;

pub use bus::{
    DisruptionEnvelope, DisruptionRouter, EventKind, EventPublisher, FileEventPublisher,
    ItineraryEvent, MemoryEventBus,
};
pub use catalog::{load_catalog, CatalogProvider, SampleCatalog, StaticCatalog};
pub use config::PlanningConfig;
pub use crate::core::{ItineraryAgent, PlanHistory, SessionStep};
pub use error::{ItineraryError, Result};
pub use services::{ActivityScorer, BudgetValidator, Planner, Replanner};
pub use types::{
    Advisory, BudgetSpec, Disruption, Plan, PlanReport, SweepRow, TravelOption, ValidationStatus,
};

#[cfg(feature = "cli")]
pub mod cli;
