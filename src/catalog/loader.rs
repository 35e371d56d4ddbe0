use super::provider::StaticCatalog;
use crate::{
    error::{ItineraryError, Result},
    schemas::{deserialize_validated, SchemaHandle},
    types::{Category, TravelOption},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// On-disk catalog layout: one list per category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CatalogFile {
    /// Transport legs, price is the whole party's fare
    #[serde(default)]
    pub transport: Vec<TravelOption>,
    /// Places to stay, price is per night
    #[serde(default)]
    pub accommodation: Vec<TravelOption>,
    /// Activities, price is per booking
    #[serde(default)]
    pub activities: Vec<TravelOption>,
}

impl CatalogFile {
    pub fn schema() -> Result<SchemaHandle> {
        SchemaHandle::of::<CatalogFile>("catalog_file")
    }

    fn sections(&self) -> [(Category, &[TravelOption]); 3] {
        [
            (Category::Transport, self.transport.as_slice()),
            (Category::Accommodation, self.accommodation.as_slice()),
            (Category::Activity, self.activities.as_slice()),
        ]
    }

    /// Check what the schema cannot express: placement, prices and unique ids.
    fn check(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for (category, options) in self.sections() {
            for option in options {
                if option.category != category {
                    return Err(ItineraryError::Catalog(format!(
                        "option `{}` is listed under {} but declares category {}",
                        option.id, category, option.category
                    )));
                }
                if !option.price.is_finite() || option.price < 0.0 {
                    return Err(ItineraryError::Catalog(format!(
                        "option `{}` has invalid price {}",
                        option.id, option.price
                    )));
                }
                if !option.value_score.is_finite() {
                    return Err(ItineraryError::Catalog(format!(
                        "option `{}` has invalid value_score {}",
                        option.id, option.value_score
                    )));
                }
                if !seen.insert(option.id.as_str()) {
                    return Err(ItineraryError::Catalog(format!(
                        "duplicate option id `{}`",
                        option.id
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn into_catalog(self) -> StaticCatalog {
        StaticCatalog::from_options(
            self.transport
                .into_iter()
                .chain(self.accommodation)
                .chain(self.activities),
        )
    }
}

/// Parse and validate an in-memory catalog document
pub fn parse_catalog(payload: &Value) -> Result<StaticCatalog> {
    let schema = CatalogFile::schema()?;
    let file: CatalogFile = deserialize_validated(&schema, payload)?;
    file.check()?;
    Ok(file.into_catalog())
}

/// Load a catalog from a JSON file
pub fn load_catalog(path: impl AsRef<Path>) -> Result<StaticCatalog> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let payload: Value = serde_json::from_str(&raw)?;
    let catalog = parse_catalog(&payload)?;

    info!(
        target: "itinerary::catalog",
        "Loaded {} options from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}
