use crate::error::{ItineraryError, Result};
use crate::types::{Category, TravelOption};

/// Source of bookable options for a planning session.
///
/// Implementations are read-only for the lifetime of a session. Errors are
/// scoped to one category: a failing category degrades its slots and leaves
/// the rest of the plan intact.
pub trait CatalogProvider: Send + Sync + std::fmt::Debug {
    fn transport_options(&self) -> Result<Vec<TravelOption>>;

    fn accommodation_options(&self) -> Result<Vec<TravelOption>>;

    fn activity_options(&self) -> Result<Vec<TravelOption>>;

    /// Options of one category, in catalog order
    fn options_for(&self, category: Category) -> Result<Vec<TravelOption>> {
        match category {
            Category::Transport => self.transport_options(),
            Category::Accommodation => self.accommodation_options(),
            Category::Activity => self.activity_options(),
        }
    }
}

/// In-memory catalog keeping options in registration order
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog {
    transport: Vec<TravelOption>,
    accommodation: Vec<TravelOption>,
    activities: Vec<TravelOption>,
}

impl StaticCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: impl IntoIterator<Item = TravelOption>) -> Self {
        let mut catalog = Self::new();
        for option in options {
            catalog.register(option);
        }
        catalog
    }

    /// Register an option under its own category
    pub fn register(&mut self, option: TravelOption) {
        self.bucket_mut(option.category).push(option);
    }

    pub fn with_option(mut self, option: TravelOption) -> Self {
        self.register(option);
        self
    }

    /// Get an option by id
    pub fn get(&self, id: &str) -> Option<&TravelOption> {
        self.iter().find(|option| option.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TravelOption> {
        self.transport
            .iter()
            .chain(self.accommodation.iter())
            .chain(self.activities.iter())
    }

    pub fn len(&self) -> usize {
        self.transport.len() + self.accommodation.len() + self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bucket(&self, category: Category) -> &[TravelOption] {
        match category {
            Category::Transport => &self.transport,
            Category::Accommodation => &self.accommodation,
            Category::Activity => &self.activities,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut Vec<TravelOption> {
        match category {
            Category::Transport => &mut self.transport,
            Category::Accommodation => &mut self.accommodation,
            Category::Activity => &mut self.activities,
        }
    }

    fn listed(&self, category: Category) -> Result<Vec<TravelOption>> {
        let bucket = self.bucket(category);
        if bucket.is_empty() {
            return Err(ItineraryError::EmptyCategoryCatalog(category));
        }
        Ok(bucket.to_vec())
    }
}

impl CatalogProvider for StaticCatalog {
    fn transport_options(&self) -> Result<Vec<TravelOption>> {
        self.listed(Category::Transport)
    }

    fn accommodation_options(&self) -> Result<Vec<TravelOption>> {
        self.listed(Category::Accommodation)
    }

    fn activity_options(&self) -> Result<Vec<TravelOption>> {
        self.listed(Category::Activity)
    }
}
