//! Typed single-field edits.
//!
//! Form inputs arrive as text. Parsing here applies the same coercion the
//! form does: numbers that fail to parse become `0`, postal codes are cut to
//! four characters, enum values must name a known variant.

use crate::error::{OprError, Result};

use super::{City, CityType, IslandGroup, Route, SubLocalityType, Waypoint};

const POSTAL_CODE_MAX_LEN: usize = 4;

/// Edit to one attribute of the city
#[derive(Debug, Clone, PartialEq)]
pub enum CityField {
    IslandGroup(IslandGroup),
    Region(String),
    RegionCode(String),
    Province(String),
    ProvinceCode(String),
    Name(String),
    CityType(CityType),
    PostalCode(String),
    Latitude(f64),
    Longitude(f64),
}

impl CityField {
    pub const NAMES: &'static [&'static str] = &[
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
    ];

    /// Parse a field name and raw form value
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        Ok(match field {
            "island_group" => CityField::IslandGroup(value.parse()?),
            "region" => CityField::Region(value.to_string()),
            "region_code" => CityField::RegionCode(value.to_string()),
            "province" => CityField::Province(value.to_string()),
            "province_code" => CityField::ProvinceCode(value.to_string()),
            "city" | "name" => CityField::Name(value.to_string()),
            "city_type" => CityField::CityType(value.parse()?),
            "postal_code" => CityField::PostalCode(value.to_string()),
            "latitude" | "lat" => CityField::Latitude(coerce_number(value)),
            "longitude" | "lng" => CityField::Longitude(coerce_number(value)),
            _ => return Err(unknown_field(field, Self::NAMES)),
        })
    }

    pub(crate) fn apply(self, city: &mut City) {
        match self {
            CityField::IslandGroup(v) => city.island_group = v,
            CityField::Region(v) => city.region = v,
            CityField::RegionCode(v) => city.region_code = v,
            CityField::Province(v) => city.province = v,
            CityField::ProvinceCode(v) => city.province_code = v,
            CityField::Name(v) => city.name = v,
            CityField::CityType(v) => city.city_type = v,
            CityField::PostalCode(v) => {
                city.postal_code = v.chars().take(POSTAL_CODE_MAX_LEN).collect()
            }
            CityField::Latitude(v) => city.latitude = v,
            CityField::Longitude(v) => city.longitude = v,
        }
    }

    /// Whether applying this edit can move the city marker
    pub fn moves_city(&self) -> bool {
        matches!(self, CityField::Latitude(_) | CityField::Longitude(_))
    }
}

/// Edit to one attribute of a route
#[derive(Debug, Clone, PartialEq)]
pub enum RouteField {
    Code(String),
    Name(String),
}

impl RouteField {
    pub const NAMES: &'static [&'static str] = &["route_code", "name"];

    pub fn parse(field: &str, value: &str) -> Result<Self> {
        match field {
            "route_code" | "code" => Ok(RouteField::Code(value.to_string())),
            "name" => Ok(RouteField::Name(value.to_string())),
            _ => Err(unknown_field(field, Self::NAMES)),
        }
    }

    pub(crate) fn apply(self, route: &mut Route) {
        match self {
            RouteField::Code(v) => route.route_code = v,
            RouteField::Name(v) => route.name = v,
        }
    }
}

/// Edit to one attribute of a waypoint.
///
/// Editing `sequence` directly is allowed and never renumbers the list.
#[derive(Debug, Clone, PartialEq)]
pub enum WaypointField {
    Sequence(u32),
    SubLocality(String),
    SubLocalityType(SubLocalityType),
    Street(String),
    Destination(String),
    Latitude(f64),
    Longitude(f64),
}

impl WaypointField {
    pub const NAMES: &'static [&'static str] = &[
        "sequence",
        "sub_locality",
        "sub_locality_type",
        "street",
        "destination",
        "latitude",
        "longitude",
    ];

    pub fn parse(field: &str, value: &str) -> Result<Self> {
        Ok(match field {
            "sequence" => WaypointField::Sequence(value.trim().parse().unwrap_or(0)),
            "sub_locality" => WaypointField::SubLocality(value.to_string()),
            "sub_locality_type" => WaypointField::SubLocalityType(value.parse()?),
            "street" => WaypointField::Street(value.to_string()),
            "destination" => WaypointField::Destination(value.to_string()),
            "latitude" | "lat" => WaypointField::Latitude(coerce_number(value)),
            "longitude" | "lng" => WaypointField::Longitude(coerce_number(value)),
            _ => return Err(unknown_field(field, Self::NAMES)),
        })
    }

    pub(crate) fn apply(self, waypoint: &mut Waypoint) {
        match self {
            WaypointField::Sequence(v) => waypoint.sequence = v,
            WaypointField::SubLocality(v) => waypoint.sub_locality = v,
            WaypointField::SubLocalityType(v) => waypoint.sub_locality_type = v,
            WaypointField::Street(v) => waypoint.street = v,
            WaypointField::Destination(v) => waypoint.destination = v,
            WaypointField::Latitude(v) => waypoint.latitude = v,
            WaypointField::Longitude(v) => waypoint.longitude = v,
        }
    }
}

/// Numeric form coercion: anything that is not a finite number becomes 0
fn coerce_number(value: &str) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

fn unknown_field(field: &str, expected: &[&str]) -> OprError {
    OprError::UnknownField { field: field.to_string(), expected: expected.join(", ") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(coerce_number("14.55"), 14.55);
        assert_eq!(coerce_number(" -121.5 "), -121.5);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("abc"), 0.0);
        assert_eq!(coerce_number("NaN"), 0.0);
    }

    #[test]
    fn test_parse_city_field() {
        assert_eq!(
            CityField::parse("island_group", "Luzon").unwrap(),
            CityField::IslandGroup(IslandGroup::Luzon)
        );
        assert_eq!(CityField::parse("lat", "nope").unwrap(), CityField::Latitude(0.0));
        assert!(CityField::parse("mayor", "x").is_err());
        assert!(CityField::parse("city_type", "hamlet").is_err());
    }

    #[test]
    fn test_postal_code_truncated() {
        let mut city = City::default();
        CityField::PostalCode("500012".to_string()).apply(&mut city);
        assert_eq!(city.postal_code, "5000");
    }

    #[test]
    fn test_parse_waypoint_field() {
        assert_eq!(WaypointField::parse("sequence", "7").unwrap(), WaypointField::Sequence(7));
        assert_eq!(WaypointField::parse("sequence", "x").unwrap(), WaypointField::Sequence(0));
        assert_eq!(
            WaypointField::parse("sub_locality_type", "District").unwrap(),
            WaypointField::SubLocalityType(SubLocalityType::District)
        );
        let err = WaypointField::parse("colour", "red").unwrap_err();
        assert!(err.to_string().contains("sub_locality_type"));
    }

    #[test]
    fn test_parse_route_field() {
        assert_eq!(RouteField::parse("code", "7A").unwrap(), RouteField::Code("7A".to_string()));
        assert_eq!(RouteField::parse("name", "Jaro").unwrap(), RouteField::Name("Jaro".to_string()));
        assert!(RouteField::parse("waypoints", "[]").is_err());
    }
}
