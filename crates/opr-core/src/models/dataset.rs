use serde::{Deserialize, Serialize};

use super::{City, Route};

/// The root document: one city and its ordered routes.
///
/// Serializes to the flat exchange shape (`country`, `island_group`, ...,
/// `latitude`, `longitude`, `routes`). Every edit produces a new snapshot;
/// see [`crate::mutations`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(flatten)]
    pub city: City,
    pub routes: Vec<Route>,
}

fn default_country() -> String {
    "Philippines".to_string()
}

fn default_country_code() -> String {
    "PH".to_string()
}

impl Dataset {
    pub fn route(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    /// Total number of waypoints across all routes
    pub fn waypoint_count(&self) -> usize {
        self.routes.iter().map(|r| r.waypoints.len()).sum()
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            country: default_country(),
            country_code: default_country_code(),
            city: City::default(),
            routes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CityType, IslandGroup};

    #[test]
    fn test_default_dataset() {
        let dataset = Dataset::default();
        assert_eq!(dataset.country, "Philippines");
        assert_eq!(dataset.country_code, "PH");
        assert_eq!(dataset.city.island_group, IslandGroup::Visayas);
        assert_eq!(dataset.city.name, "Iloilo City");
        assert_eq!(dataset.city.city_type, CityType::Municipality);
        assert_eq!(dataset.city.postal_code, "0000");
        assert_eq!(dataset.city.latitude, 10.7202);
        assert_eq!(dataset.city.longitude, 122.5621);
        assert!(dataset.routes.is_empty());
    }

    #[test]
    fn test_serializes_flat_field_names() {
        let value = serde_json::to_value(Dataset::default()).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "country",
            "country_code",
            "island_group",
            "region",
            "region_code",
            "province",
            "province_code",
            "city",
            "city_type",
            "postal_code",
            "latitude",
            "longitude",
            "routes",
        ] {
            assert!(object.contains_key(key), "missing key {}", key);
        }
        assert_eq!(object.len(), 13);
        assert_eq!(object["city"], "Iloilo City");
    }
}
