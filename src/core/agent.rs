use super::memory::PlanHistory;
use crate::{
    bus::EventPublisher,
    catalog::{load_catalog, CatalogProvider, SampleCatalog},
    config::{PlanningConfig, ENV_CATALOG},
    error::Result,
    services::{budget::BudgetValidator, planning::Planner, replanning::Replanner},
    types::{BudgetSpec, Plan},
};
use std::sync::Arc;
use uuid::Uuid;

/// Coordinator for one itinerary session.
///
/// Owns the session's plan history and is the only component that talks to
/// the message bus. Planning itself is delegated to the services.
#[derive(Debug)]
pub struct ItineraryAgent {
    session_id: String,
    catalog: Arc<dyn CatalogProvider>,
    publisher: Arc<dyn EventPublisher>,
    config: PlanningConfig,
    planner: Planner,
    replanner: Replanner,
    validator: BudgetValidator,
    spec: Option<BudgetSpec>,
    history: PlanHistory,
    sequence: u64,
}

impl ItineraryAgent {
    pub fn new(catalog: Arc<dyn CatalogProvider>, publisher: Arc<dyn EventPublisher>) -> Self {
        let config = PlanningConfig::default();
        Self {
            session_id: Uuid::new_v4().to_string(),
            catalog,
            publisher,
            planner: Planner::new(),
            replanner: Replanner::new(config.clone()),
            validator: BudgetValidator::new(config.min_per_person_per_night),
            config,
            spec: None,
            history: PlanHistory::new(),
            sequence: 0,
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn with_config(mut self, config: PlanningConfig) -> Self {
        self.replanner = Replanner::new(config.clone());
        self.validator = BudgetValidator::new(config.min_per_person_per_night);
        self.config = config;
        self
    }

    /// Agent configured from `ITINERARY_*` variables.
    ///
    /// Uses the catalog file named by `ITINERARY_CATALOG` when set, otherwise
    /// the built-in sample catalog priced for `people_count` travellers.
    pub fn from_env(people_count: u32, publisher: Arc<dyn EventPublisher>) -> Result<Self> {
        let config = PlanningConfig::from_env()?;
        let catalog: Arc<dyn CatalogProvider> = match std::env::var(ENV_CATALOG) {
            Ok(path) if !path.trim().is_empty() => Arc::new(load_catalog(path.trim())?),
            _ => Arc::new(SampleCatalog::for_party(people_count)),
        };
        Ok(Self::new(catalog, publisher).with_config(config))
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    pub fn catalog(&self) -> &dyn CatalogProvider {
        self.catalog.as_ref()
    }

    /// Request the current plan was built for
    pub fn spec(&self) -> Option<&BudgetSpec> {
        self.spec.as_ref()
    }

    pub fn history(&self) -> &PlanHistory {
        &self.history
    }

    pub fn current_plan(&self) -> Option<&Plan> {
        self.history.current()
    }

    pub(crate) fn planner(&self) -> &Planner {
        &self.planner
    }

    pub(crate) fn replanner(&self) -> &Replanner {
        &self.replanner
    }

    pub(crate) fn validator(&self) -> &BudgetValidator {
        &self.validator
    }

    pub(crate) fn publisher(&self) -> &Arc<dyn EventPublisher> {
        &self.publisher
    }

    pub(crate) fn set_spec(&mut self, spec: BudgetSpec) {
        self.spec = Some(spec);
    }

    pub(crate) fn history_mut(&mut self) -> &mut PlanHistory {
        &mut self.history
    }

    pub(crate) fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }
}
