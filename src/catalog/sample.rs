use super::provider::StaticCatalog;
use crate::types::{Setting, TravelOption};
use serde_json::json;

/// Built-in deterministic catalog for demos and tests.
///
/// Transport fares are listed per person and multiplied by the party size,
/// so `price` on each transport option is what the whole party pays.
#[derive(Debug)]
pub struct SampleCatalog;

impl SampleCatalog {
    pub fn for_party(people: u32) -> StaticCatalog {
        let party = f64::from(people.max(1));
        let mut catalog = StaticCatalog::new();

        for (id, kind, name, fare, hours, value) in [
            ("flight_economy", "flight", "Flight (Economy)", 8000.0, 2.0, 7.0),
            ("flight_premium", "flight", "Flight (Premium Economy)", 12000.0, 2.0, 8.0),
            ("road_bus", "road", "Bus", 1500.0, 10.0, 3.0),
            ("road_car", "road", "Private Car (shared)", 4000.0, 6.0, 5.0),
        ] {
            catalog.register(
                TravelOption::transport(id, kind, fare * party, value)
                    .with_name(name)
                    .with_duration_hours(hours)
                    .with_attribute("fare_per_person", fare),
            );
        }

        for (id, tier, name, nightly, comfort) in [
            ("hostel", "budget", "Hostel", 1000.0, 3.0),
            ("guesthouse", "mid", "Guest House", 2500.0, 6.0),
            ("resort", "premium", "Resort", 8000.0, 9.0),
        ] {
            catalog.register(
                TravelOption::accommodation(id, "lodging", nightly, comfort)
                    .with_name(name)
                    .with_attribute("tier", tier),
            );
        }

        for (id, kind, name, price, score, setting, pace) in [
            ("beach_visit", "beach", "Beach Visit", 0.0, 5.0, Setting::Outdoor, "relaxed"),
            ("water_sports", "water", "Water Sports", 3000.0, 8.0, Setting::Outdoor, "active"),
            ("spa", "wellness", "Spa Session", 2500.0, 6.0, Setting::Indoor, "relaxed"),
            ("museums", "culture", "Local Museums", 500.0, 4.0, Setting::Indoor, "relaxed"),
            ("boat_cruise", "water", "Boat Cruise", 2000.0, 7.0, Setting::Outdoor, "relaxed"),
            ("food_tour", "culture", "Local Food Tour", 1500.0, 6.0, Setting::Indoor, "active"),
        ] {
            catalog.register(
                TravelOption::activity(id, kind, price, score, setting)
                    .with_name(name)
                    .with_attribute("pace", json!(pace)),
            );
        }

        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogProvider;

    #[test]
    fn test_transport_scales_with_party() {
        let solo = SampleCatalog::for_party(1);
        let pair = SampleCatalog::for_party(2);

        assert_eq!(solo.get("flight_economy").unwrap().price, 8000.0);
        assert_eq!(pair.get("flight_economy").unwrap().price, 16000.0);
        assert_eq!(pair.get("resort").unwrap().price, 8000.0);
    }

    #[test]
    fn test_sample_shape() {
        let catalog = SampleCatalog::for_party(1);
        assert_eq!(catalog.transport_options().unwrap().len(), 4);
        assert_eq!(catalog.accommodation_options().unwrap().len(), 3);

        let activities = catalog.activity_options().unwrap();
        assert_eq!(activities.len(), 6);
        assert!(activities.iter().all(|a| a.setting.is_some()));
    }
}
