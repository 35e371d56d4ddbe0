//! Catalog Provider interface and built-in catalogs

pub mod loader;
pub mod provider;
pub mod sample;

pub use loader::{load_catalog, parse_catalog, CatalogFile};
pub use provider::{CatalogProvider, StaticCatalog};
pub use sample::SampleCatalog;
