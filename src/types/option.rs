use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Which part of the trip an option covers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Transport,
    Accommodation,
    Activity,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Transport,
        Category::Accommodation,
        Category::Activity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Transport => "transport",
            Category::Accommodation => "accommodation",
            Category::Activity => "activity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indoor/outdoor flag carried by activities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Setting {
    Indoor,
    Outdoor,
}

/// A bookable catalog entry: a transport leg, a place to stay, or an activity.
///
/// Options are reference data: loaded once per session and never mutated.
/// Transport `price` is the fare for the whole party, accommodation `price`
/// is per night, activity `price` is per booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TravelOption {
    /// Stable catalog identifier
    pub id: String,
    /// Which slot of the plan this option can fill
    pub category: Category,
    /// Free-form kind such as "flight", "hotel" or "museum"
    #[serde(rename = "type")]
    pub kind: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Non-negative price in currency-agnostic units
    pub price: f64,
    /// Indoor/outdoor flag, meaningful for activities only
    #[serde(default, rename = "indoor_outdoor", skip_serializing_if = "Option::is_none")]
    pub setting: Option<Setting>,
    /// Provider-supplied baseline quality
    pub value_score: f64,
    /// Door-to-door travel time, meaningful for transport only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
    /// Feature name to value, used for similarity comparisons
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
}

impl TravelOption {
    pub fn new(
        id: impl Into<String>,
        category: Category,
        kind: impl Into<String>,
        price: f64,
        value_score: f64,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            category,
            kind: kind.into(),
            price,
            setting: None,
            value_score,
            duration_hours: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn transport(id: impl Into<String>, kind: impl Into<String>, price: f64, value: f64) -> Self {
        Self::new(id, Category::Transport, kind, price, value)
    }

    pub fn accommodation(
        id: impl Into<String>,
        kind: impl Into<String>,
        price_per_night: f64,
        value: f64,
    ) -> Self {
        Self::new(id, Category::Accommodation, kind, price_per_night, value)
    }

    pub fn activity(
        id: impl Into<String>,
        kind: impl Into<String>,
        price: f64,
        value: f64,
        setting: Setting,
    ) -> Self {
        Self::new(id, Category::Activity, kind, price, value).with_setting(setting)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_setting(mut self, setting: Setting) -> Self {
        self.setting = Some(setting);
        self
    }

    pub fn with_duration_hours(mut self, hours: f64) -> Self {
        self.duration_hours = Some(hours);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn is_outdoor(&self) -> bool {
        self.setting == Some(Setting::Outdoor)
    }

    pub fn is_indoor(&self) -> bool {
        self.setting == Some(Setting::Indoor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_option_wire_names() {
        let option = TravelOption::activity("spa", "wellness", 2500.0, 6.0, Setting::Indoor)
            .with_attribute("guided", false);
        let value = serde_json::to_value(&option).unwrap();

        assert_eq!(value["type"], "wellness");
        assert_eq!(value["indoor_outdoor"], "indoor");
        assert_eq!(value["category"], "activity");
        assert_eq!(value["attributes"]["guided"], false);
        assert!(value.get("duration_hours").is_none());
    }

    #[test]
    fn test_option_defaults_when_deserializing() {
        let option: TravelOption = serde_json::from_value(json!({
            "id": "bus",
            "category": "transport",
            "type": "road",
            "price": 1500.0,
            "value_score": 3.0
        }))
        .unwrap();

        assert_eq!(option.name, "");
        assert!(option.setting.is_none());
        assert!(option.attributes.is_empty());
    }
}
