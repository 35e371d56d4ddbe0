use itinerary_agent::{
    catalog::{parse_catalog, CatalogFile},
    load_catalog, BudgetSpec, CatalogProvider, ItineraryError, Planner,
};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_catalog(payload: &serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", payload).unwrap();
    file
}

#[test]
fn test_schema_has_correct_structure() {
    let handle = CatalogFile::schema().unwrap();
    let schema = handle.schema_json();

    assert_eq!(handle.schema_name(), "catalog_file");
    assert_eq!(schema["type"], "object");

    let props = schema["properties"].as_object().unwrap();
    assert!(props.contains_key("transport"));
    assert!(props.contains_key("accommodation"));
    assert!(props.contains_key("activities"));

    let option = &schema["definitions"]["TravelOption"];
    let required: Vec<&str> = option["required"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    for field in ["id", "category", "type", "price", "value_score"] {
        assert!(required.contains(&field), "{} should be required", field);
    }
    assert!(!required.contains(&"attributes"));
}

#[test]
fn test_load_catalog_from_file() {
    let file = write_catalog(&json!({
        "transport": [
            {"id": "train", "category": "transport", "type": "rail", "price": 3000,
             "value_score": 6, "duration_hours": 4.5}
        ],
        "accommodation": [
            {"id": "inn", "category": "accommodation", "type": "lodging", "price": 1500,
             "value_score": 5, "attributes": {"tier": "mid"}}
        ],
        "activities": [
            {"id": "gallery", "category": "activity", "type": "culture", "price": 400,
             "value_score": 5, "indoor_outdoor": "indoor"},
            {"id": "surf", "category": "activity", "type": "water", "price": 1200,
             "value_score": 7, "indoor_outdoor": "outdoor"}
        ]
    }));

    let catalog = load_catalog(file.path()).unwrap();
    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.transport_options().unwrap()[0].duration_hours, Some(4.5));

    let plan = Planner::new().plan(&BudgetSpec::new(10000.0, 1, 2), &catalog);
    assert_eq!(plan.scheduled_activity_ids(), vec!["surf", "gallery"]);
    assert_eq!(plan.total_cost, 3000.0 + 3000.0 + 1600.0);
}

#[test]
fn test_invalid_json_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();

    let err = load_catalog(file.path()).unwrap_err();
    assert!(matches!(err, ItineraryError::Serialization(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_catalog("/nonexistent/catalog.json").unwrap_err();
    assert!(matches!(err, ItineraryError::Io(_)));
    assert!(err.is_fatal());
}

#[test]
fn test_schema_violations_are_reported() {
    let err = parse_catalog(&json!({
        "activities": [
            {"id": "a", "category": "activity", "type": "x", "price": "free", "value_score": 1},
            {"id": "b", "category": "weekend", "type": "x", "price": 1, "value_score": 1},
            {"category": "activity", "type": "x", "price": 1, "value_score": 1},
            {"id": "d", "category": "activity", "type": "x", "price": 1}
        ]
    }))
    .unwrap_err();

    let message = err.to_string();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert!(message.contains("catalog_file"));
    assert!(message.contains("more violation(s) not shown"));
    assert!(message.contains("option `a`"));
}

#[test]
fn test_negative_price_rejected() {
    let err = parse_catalog(&json!({
        "accommodation": [
            {"id": "tent", "category": "accommodation", "type": "camping", "price": -10, "value_score": 2}
        ]
    }))
    .unwrap_err();
    assert_eq!(err.error_code(), "CATALOG_ERROR");
}
