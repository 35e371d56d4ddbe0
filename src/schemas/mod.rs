//! Schema generation and strict validation for JSON inputs

pub mod schema;
pub mod validation;

pub use schema::SchemaHandle;
pub use validation::{deserialize_validated, schema_violations, validate_against_schema, SchemaViolation};
