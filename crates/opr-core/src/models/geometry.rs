use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS 84 position.
///
/// Map widgets and the geocoding service speak `[lng, lat]`; the dataset
/// stores `latitude`/`longitude` separately. Use [`Coordinate::from_lng_lat`]
/// and [`Coordinate::to_lng_lat`] at those boundaries so the order never gets
/// swapped by hand.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build from a `[lng, lat]` pair
    pub fn from_lng_lat(lng_lat: [f64; 2]) -> Self {
        Self { latitude: lng_lat[1], longitude: lng_lat[0] }
    }

    /// Return as a `[lng, lat]` pair
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Great-circle distance in meters
    pub fn distance_to(self, other: Coordinate) -> f64 {
        Haversine.distance(Point::from(self), Point::from(other))
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(coord: Coordinate) -> Self {
        Point::new(coord.longitude, coord.latitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lng_lat_order() {
        let coord = Coordinate::from_lng_lat([121.05, 14.55]);
        assert_eq!(coord.latitude, 14.55);
        assert_eq!(coord.longitude, 121.05);
        assert_eq!(coord.to_lng_lat(), [121.05, 14.55]);
    }

    #[test]
    fn test_distance_to() {
        let a = Coordinate::new(10.7202, 122.5621);
        assert_eq!(a.distance_to(a), 0.0);

        // Roughly 111 km per degree of latitude
        let b = Coordinate::new(11.7202, 122.5621);
        let d = a.distance_to(b);
        assert!(d > 110_000.0 && d < 112_000.0, "unexpected distance {}", d);
    }
}
