use crate::error::OprError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Coordinate;

/// Kind of administrative sub-locality a waypoint sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubLocalityType {
    Barangay,
    District,
}

impl SubLocalityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubLocalityType::Barangay => "barangay",
            SubLocalityType::District => "district",
        }
    }
}

impl fmt::Display for SubLocalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubLocalityType {
    type Err = OprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "barangay" => Ok(SubLocalityType::Barangay),
            "district" => Ok(SubLocalityType::District),
            _ => Err(OprError::InvalidValue {
                field: "sub_locality_type".to_string(),
                reason: format!("'{}' is not one of barangay, district", s),
            }),
        }
    }
}

/// A stop along a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// 1-based position in the route. Kept dense by insert/delete renumbering.
    pub sequence: u32,
    pub sub_locality: String,
    pub sub_locality_type: SubLocalityType,
    pub street: String,
    pub destination: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Waypoint {
    /// Create a waypoint with the form defaults at the given position
    pub fn new(sequence: u32, at: Coordinate) -> Self {
        Self {
            sequence,
            sub_locality: "Barangay TBD".to_string(),
            sub_locality_type: SubLocalityType::Barangay,
            street: "Main St".to_string(),
            destination: "Terminal".to_string(),
            latitude: at.latitude,
            longitude: at.longitude,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// A zero on either axis marks the position as not yet known
    pub fn needs_geocoding(&self) -> bool {
        self.latitude == 0.0 || self.longitude == 0.0
    }

    /// Free-text address used to look this waypoint up
    pub fn geocode_query(&self) -> String {
        [self.street.trim(), self.destination.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_waypoint_defaults() {
        let wp = Waypoint::new(3, Coordinate::new(10.0, 122.0));
        assert_eq!(wp.sequence, 3);
        assert_eq!(wp.sub_locality, "Barangay TBD");
        assert_eq!(wp.sub_locality_type, SubLocalityType::Barangay);
        assert_eq!(wp.street, "Main St");
        assert_eq!(wp.destination, "Terminal");
        assert_eq!(wp.coordinate(), Coordinate::new(10.0, 122.0));
    }

    #[test]
    fn test_needs_geocoding() {
        let mut wp = Waypoint::new(1, Coordinate::new(10.0, 122.0));
        assert!(!wp.needs_geocoding());

        wp.longitude = 0.0;
        assert!(wp.needs_geocoding());

        wp.longitude = 122.0;
        wp.latitude = 0.0;
        assert!(wp.needs_geocoding());
    }

    #[test]
    fn test_geocode_query() {
        let mut wp = Waypoint::new(1, Coordinate::default());
        wp.street = "  Iznart St ".to_string();
        wp.destination = "City Proper".to_string();
        assert_eq!(wp.geocode_query(), "Iznart St City Proper");

        wp.street = String::new();
        assert_eq!(wp.geocode_query(), "City Proper");

        wp.destination = "   ".to_string();
        assert_eq!(wp.geocode_query(), "");
    }
}
