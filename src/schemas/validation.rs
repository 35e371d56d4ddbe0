use crate::{
    error::{ItineraryError, Result},
    schemas::SchemaHandle,
};
use jsonschema::{Draft, JSONSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

const MAX_REPORTED_VIOLATIONS: usize = 3;

/// One place where a document breaks its schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaViolation {
    /// JSON pointer to the offending value, `<root>` for the document itself
    pub pointer: String,
    /// `id` of the nearest enclosing object that has one
    pub option_id: Option<String>,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.option_id {
            Some(id) => write!(f, "{} (option `{}`): {}", self.pointer, id, self.message),
            None => write!(f, "{}: {}", self.pointer, self.message),
        }
    }
}

/// Every violation of `schema` in `payload`, in validator order.
pub fn schema_violations(schema: &SchemaHandle, payload: &Value) -> Result<Vec<SchemaViolation>> {
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema.schema_json())
        .map_err(|err| {
            ItineraryError::Validation(format!(
                "`{}` schema does not compile: {}",
                schema.schema_name(),
                err
            ))
        })?;

    let violations = match compiled.validate(payload) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|error| {
                let pointer = error.instance_path.to_string();
                SchemaViolation {
                    option_id: owning_option_id(payload, &pointer),
                    pointer: if pointer.is_empty() {
                        "<root>".to_string()
                    } else {
                        pointer
                    },
                    message: error.to_string(),
                }
            })
            .collect(),
    };
    Ok(violations)
}

/// Reject `payload` unless it matches `schema`, naming the first few violations.
pub fn validate_against_schema(schema: &SchemaHandle, payload: &Value) -> Result<()> {
    let violations = schema_violations(schema, payload)?;
    if violations.is_empty() {
        return Ok(());
    }

    let mut detail = violations
        .iter()
        .take(MAX_REPORTED_VIOLATIONS)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    if violations.len() > MAX_REPORTED_VIOLATIONS {
        detail.push_str(&format!(
            "; {} more violation(s) not shown",
            violations.len() - MAX_REPORTED_VIOLATIONS
        ));
    }

    Err(ItineraryError::Validation(format!(
        "`{}` rejected: {}",
        schema.schema_name(),
        detail
    )))
}

/// Walk from the violation up towards the root and return the first `id` found.
fn owning_option_id(payload: &Value, pointer: &str) -> Option<String> {
    let segments: Vec<&str> = pointer.split('/').skip(1).collect();
    (0..=segments.len()).rev().find_map(|depth| {
        let ancestor = segments[..depth]
            .iter()
            .fold(String::new(), |path, segment| format!("{}/{}", path, segment));
        payload
            .pointer(&ancestor)?
            .get("id")?
            .as_str()
            .map(str::to_string)
    })
}

/// Validate against the schema, then deserialize with path-aware errors
pub fn deserialize_validated<T>(schema: &SchemaHandle, payload: &Value) -> Result<T>
where
    T: DeserializeOwned,
{
    validate_against_schema(schema, payload)?;

    serde_path_to_error::deserialize(payload).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        ItineraryError::Validation(format!(
            "failed to deserialize `{}` at {}: {}",
            schema.schema_name(),
            location,
            err
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, JsonSchema)]
    struct Fare {
        id: String,
        price: f64,
    }

    #[test]
    fn test_valid_payload_deserializes() {
        let schema = SchemaHandle::of::<Fare>("fare").unwrap();
        let fare: Fare =
            deserialize_validated(&schema, &json!({"id": "bus", "price": 1500.0})).unwrap();
        assert_eq!(fare.id, "bus");
        assert_eq!(fare.price, 1500.0);
    }

    #[test]
    fn test_schema_violation_reports_path() {
        let schema = SchemaHandle::of::<Fare>("fare").unwrap();
        let err = validate_against_schema(&schema, &json!({"id": "bus", "price": "cheap"}))
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("`fare`"));
        assert!(message.contains("/price"));
    }

    #[test]
    fn test_violations_name_owning_option() {
        #[derive(Debug, Deserialize, JsonSchema)]
        struct Fares {
            fares: Vec<Fare>,
        }

        let schema = SchemaHandle::of::<Fares>("fares").unwrap();
        let payload = json!({"fares": [
            {"id": "bus", "price": 900.0},
            {"id": "ferry", "price": "cheap"},
            {"price": 100.0}
        ]});

        let violations = schema_violations(&schema, &payload).unwrap();
        assert_eq!(violations.len(), 2);

        let ferry = violations
            .iter()
            .find(|violation| violation.pointer == "/fares/1/price")
            .unwrap();
        assert_eq!(ferry.option_id.as_deref(), Some("ferry"));
        assert!(ferry.to_string().contains("option `ferry`"));

        let unnamed = violations
            .iter()
            .find(|violation| violation.pointer == "/fares/2")
            .unwrap();
        assert_eq!(unnamed.option_id, None);
    }
}
