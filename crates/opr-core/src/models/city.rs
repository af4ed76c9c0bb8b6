use crate::error::OprError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Coordinate;

/// Major island group of the Philippines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IslandGroup {
    Luzon,
    Visayas,
    Mindanao,
}

impl IslandGroup {
    pub const ALL: [IslandGroup; 3] = [IslandGroup::Luzon, IslandGroup::Visayas, IslandGroup::Mindanao];

    pub fn as_str(&self) -> &'static str {
        match self {
            IslandGroup::Luzon => "Luzon",
            IslandGroup::Visayas => "Visayas",
            IslandGroup::Mindanao => "Mindanao",
        }
    }
}

impl fmt::Display for IslandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IslandGroup {
    type Err = OprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "luzon" => Ok(IslandGroup::Luzon),
            "visayas" => Ok(IslandGroup::Visayas),
            "mindanao" => Ok(IslandGroup::Mindanao),
            _ => Err(OprError::InvalidValue {
                field: "island_group".to_string(),
                reason: format!("'{}' is not one of Luzon, Visayas, Mindanao", s),
            }),
        }
    }
}

/// Local government classification of the city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CityType {
    HighlyUrbanizedCity,
    ComponentCity,
    Municipality,
}

impl CityType {
    pub const ALL: [CityType; 3] =
        [CityType::HighlyUrbanizedCity, CityType::ComponentCity, CityType::Municipality];

    pub fn as_str(&self) -> &'static str {
        match self {
            CityType::HighlyUrbanizedCity => "highly_urbanized_city",
            CityType::ComponentCity => "component_city",
            CityType::Municipality => "municipality",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            CityType::HighlyUrbanizedCity => "Highly Urbanized City",
            CityType::ComponentCity => "Component City",
            CityType::Municipality => "Municipality",
        }
    }
}

impl fmt::Display for CityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CityType {
    type Err = OprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "highly_urbanized_city" | "huc" => Ok(CityType::HighlyUrbanizedCity),
            "component_city" | "cc" => Ok(CityType::ComponentCity),
            "municipality" => Ok(CityType::Municipality),
            _ => Err(OprError::InvalidValue {
                field: "city_type".to_string(),
                reason: format!(
                    "'{}' is not one of highly_urbanized_city, component_city, municipality",
                    s
                ),
            }),
        }
    }
}

/// The city a dataset describes. Exactly one per dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub island_group: IslandGroup,
    pub region: String,
    pub region_code: String,
    pub province: String,
    pub province_code: String,
    #[serde(rename = "city")]
    pub name: String,
    pub city_type: CityType,
    /// At most 4 characters when edited through a form
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl City {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

impl Default for City {
    fn default() -> Self {
        Self {
            island_group: IslandGroup::Visayas,
            region: "Region 06".to_string(),
            region_code: "06".to_string(),
            province: "Iloilo".to_string(),
            province_code: "XX".to_string(),
            name: "Iloilo City".to_string(),
            city_type: CityType::Municipality,
            postal_code: "0000".to_string(),
            latitude: 10.7202,
            longitude: 122.5621,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_island_group() {
        assert_eq!("luzon".parse::<IslandGroup>().unwrap(), IslandGroup::Luzon);
        assert_eq!("VISAYAS".parse::<IslandGroup>().unwrap(), IslandGroup::Visayas);
        assert!("Palawan".parse::<IslandGroup>().is_err());
    }

    #[test]
    fn test_parse_city_type() {
        assert_eq!(
            "highly-urbanized-city".parse::<CityType>().unwrap(),
            CityType::HighlyUrbanizedCity
        );
        assert_eq!("component_city".parse::<CityType>().unwrap(), CityType::ComponentCity);
        assert!("village".parse::<CityType>().is_err());
    }

    #[test]
    fn test_city_type_serializes_snake_case() {
        let json = serde_json::to_string(&CityType::HighlyUrbanizedCity).unwrap();
        assert_eq!(json, "\"highly_urbanized_city\"");
    }
}
