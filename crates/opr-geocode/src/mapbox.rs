//! Mapbox adapter for the geocoding and directions ports.
//!
//! Search: `GET {geocoding_url}/{query}.json?access_token=..&limit=5[&proximity=lng,lat]`
//! returns a feature collection whose features carry `place_name`, `text`
//! and `center: [lng, lat]`.
//!
//! Directions: `GET {directions_url}/{profile}/{lng,lat;..}?geometries=geojson&overview=full&access_token=..`
//! returns `routes[0].geometry` as a GeoJSON LineString.

use async_trait::async_trait;
use geojson::{Geometry, Value};
use opr_core::config::LayeredConfig;
use opr_core::error::{OprError, Result};
use opr_core::models::Coordinate;
use reqwest::Url;
use serde::Deserialize;

use crate::models::{GeocodeResult, MAX_RESULTS};
use crate::ports::{DirectionsProvider, Geocoder};

const GEOCODING: &str = "geocoding";
const DIRECTIONS: &str = "directions";

/// Mapbox geocoding and directions client
#[derive(Debug, Clone)]
pub struct MapboxClient {
    access_token: String,
    geocoding_url: String,
    directions_url: String,
    profile: String,
    client: reqwest::Client,
}

impl MapboxClient {
    /// Create a client from the resolved configuration.
    ///
    /// Fails with `ConfigMissing` when no access token is configured.
    pub fn new(config: &LayeredConfig) -> Result<Self> {
        let access_token = config
            .access_token()
            .ok_or_else(|| OprError::ConfigMissing { key: "access_token".to_string() })?
            .to_string();

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| network(GEOCODING, e))?;

        Ok(Self {
            access_token,
            geocoding_url: config.geocoding_url.value.clone(),
            directions_url: config.directions_url.value.clone(),
            profile: config.directions_profile.value.clone(),
            client,
        })
    }

    /// Build the search URL for `query`
    pub fn search_url(&self, query: &str, proximity: Option<Coordinate>) -> Result<Url> {
        let mut url = parse_base(&self.geocoding_url, GEOCODING)?;
        url.path_segments_mut()
            .map_err(|_| invalid_base(&self.geocoding_url, GEOCODING))?
            .pop_if_empty()
            .push(&format!("{}.json", query));

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("access_token", &self.access_token);
            pairs.append_pair("limit", &MAX_RESULTS.to_string());
            if let Some(at) = proximity {
                pairs.append_pair("proximity", &format!("{},{}", at.longitude, at.latitude));
            }
        }
        Ok(url)
    }

    /// Build the directions URL through `waypoints` in order
    pub fn directions_url(&self, waypoints: &[Coordinate]) -> Result<Url> {
        let path = waypoints
            .iter()
            .map(|c| format!("{},{}", c.longitude, c.latitude))
            .collect::<Vec<_>>()
            .join(";");

        let mut url = parse_base(&self.directions_url, DIRECTIONS)?;
        url.path_segments_mut()
            .map_err(|_| invalid_base(&self.directions_url, DIRECTIONS))?
            .pop_if_empty()
            .push(&self.profile)
            .push(&path);

        url.query_pairs_mut()
            .append_pair("geometries", "geojson")
            .append_pair("overview", "full")
            .append_pair("access_token", &self.access_token);
        Ok(url)
    }

    async fn try_search(&self, query: &str, proximity: Option<Coordinate>) -> Result<Vec<GeocodeResult>> {
        let url = self.search_url(query, proximity)?;
        let body = self.fetch(url, GEOCODING).await?;
        parse_places(&body)
    }

    async fn try_route(&self, waypoints: &[Coordinate]) -> Result<Option<Vec<Coordinate>>> {
        let url = self.directions_url(waypoints)?;
        let body = self.fetch(url, DIRECTIONS).await?;
        parse_route_geometry(&body)
    }

    async fn fetch(&self, url: Url, service: &str) -> Result<String> {
        let response = self.client.get(url).send().await.map_err(|e| network(service, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(OprError::Network {
                service: service.to_string(),
                reason: format!("Mapbox API error ({}): {}", status, error_text),
            });
        }

        response.text().await.map_err(|e| network(service, e))
    }
}

#[async_trait]
impl Geocoder for MapboxClient {
    async fn search(&self, query: &str, proximity: Option<Coordinate>) -> Vec<GeocodeResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.try_search(query, proximity).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "place search failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl DirectionsProvider for MapboxClient {
    async fn route(&self, waypoints: &[Coordinate]) -> Option<Vec<Coordinate>> {
        if waypoints.len() < 2 {
            return None;
        }

        match self.try_route(waypoints).await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "directions request failed");
                None
            }
        }
    }
}

/// Parse a geocoding response body, keeping at most [`MAX_RESULTS`] places
pub fn parse_places(body: &str) -> Result<Vec<GeocodeResult>> {
    let response: PlacesResponse = serde_json::from_str(body)?;
    Ok(response
        .features
        .into_iter()
        .take(MAX_RESULTS)
        .map(|place| GeocodeResult {
            display_name: place.place_name,
            short_label: place.text,
            coordinate: Coordinate::from_lng_lat(place.center),
        })
        .collect())
}

/// Parse a directions response body into the first route's path.
///
/// `Ok(None)` means the service found no route.
pub fn parse_route_geometry(body: &str) -> Result<Option<Vec<Coordinate>>> {
    let response: DirectionsResponse = serde_json::from_str(body)?;
    let Some(route) = response.routes.into_iter().next() else {
        return Ok(None);
    };

    match route.geometry.value {
        Value::LineString(positions) => {
            let path = positions
                .into_iter()
                .filter(|p| p.len() >= 2)
                .map(|p| Coordinate::from_lng_lat([p[0], p[1]]))
                .collect::<Vec<_>>();
            Ok((path.len() >= 2).then_some(path))
        }
        _ => Err(OprError::Network {
            service: DIRECTIONS.to_string(),
            reason: "route geometry is not a LineString".to_string(),
        }),
    }
}

fn parse_base(base: &str, service: &str) -> Result<Url> {
    Url::parse(base).map_err(|_| invalid_base(base, service))
}

fn invalid_base(base: &str, service: &str) -> OprError {
    OprError::ConfigInvalid {
        key: format!("{}_url", service),
        reason: format!("'{}' is not a usable base URL", base),
    }
}

fn network(service: &str, err: reqwest::Error) -> OprError {
    OprError::Network { service: service.to_string(), reason: err.to_string() }
}

/// Response from the Mapbox geocoding API
#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    features: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    place_name: String,
    #[serde(default)]
    text: String,
    center: [f64; 2],
}

/// Response from the Mapbox directions API
#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    geometry: Geometry,
}

#[cfg(test)]
mod tests {
    use super::*;
    use opr_core::config::{CliConfigOverrides, ConfigSource, ConfigValue};

    fn client() -> MapboxClient {
        let mut config = LayeredConfig::with_defaults();
        config.update_from_cli(CliConfigOverrides {
            access_token: Some("pk.test".to_string()),
            max_waypoints: None,
        });
        MapboxClient::new(&config).unwrap()
    }

    #[test]
    fn test_requires_access_token() {
        let err = MapboxClient::new(&LayeredConfig::with_defaults()).unwrap_err();
        assert!(matches!(err, OprError::ConfigMissing { .. }));
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = client()
            .search_url("Iznart St, Iloilo/City", Some(Coordinate::new(10.72, 122.56)))
            .unwrap();

        assert_eq!(url.host_str(), Some("api.mapbox.com"));
        assert!(url.path().ends_with("/mapbox.places/Iznart%20St,%20Iloilo%2FCity.json"));
        let query = url.query().unwrap();
        assert!(query.contains("access_token=pk.test"));
        assert!(query.contains("limit=5"));
        assert!(query.contains("proximity=122.56%2C10.72"));
    }

    #[test]
    fn test_search_url_without_proximity() {
        let url = client().search_url("Jaro", None).unwrap();
        assert!(!url.query().unwrap().contains("proximity"));
    }

    #[test]
    fn test_directions_url_lists_lng_lat_pairs() {
        let url = client()
            .directions_url(&[Coordinate::new(10.7, 122.5), Coordinate::new(10.71, 122.55)])
            .unwrap();

        assert!(url.path().ends_with("/mapbox/driving/122.5,10.7;122.55,10.71"));
        let query = url.query().unwrap();
        assert!(query.contains("geometries=geojson"));
        assert!(query.contains("overview=full"));
    }

    #[test]
    fn test_custom_profile() {
        let mut config = LayeredConfig::with_defaults();
        config.access_token = ConfigValue::new(Some("pk.test".to_string()), ConfigSource::Cli);
        config.directions_profile = ConfigValue::new("walking".to_string(), ConfigSource::File);

        let url = MapboxClient::new(&config)
            .unwrap()
            .directions_url(&[Coordinate::default(), Coordinate::default()])
            .unwrap();
        assert!(url.path().contains("/walking/"));
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = LayeredConfig::with_defaults();
        config.access_token = ConfigValue::new(Some("pk.test".to_string()), ConfigSource::Cli);
        config.geocoding_url = ConfigValue::new("not a url".to_string(), ConfigSource::File);

        let err = MapboxClient::new(&config).unwrap().search_url("x", None).unwrap_err();
        assert!(matches!(err, OprError::ConfigInvalid { .. }));
    }

    #[test]
    fn test_parse_places_caps_results() {
        let features = (0..7)
            .map(|i| {
                format!(
                    r#"{{"place_name": "Place {i}, Iloilo City", "text": "Place {i}", "center": [122.5{i}, 10.7{i}]}}"#
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        let body = format!(r#"{{"type": "FeatureCollection", "features": [{}]}}"#, features);

        let places = parse_places(&body).unwrap();
        assert_eq!(places.len(), 5);
        assert_eq!(places[0].display_name, "Place 0, Iloilo City");
        assert_eq!(places[0].short_label, "Place 0");
        assert_eq!(places[1].coordinate, Coordinate::new(10.71, 122.51));
    }

    #[test]
    fn test_parse_places_empty() {
        assert!(parse_places(r#"{"features": []}"#).unwrap().is_empty());
        assert!(parse_places("{}").unwrap().is_empty());
        assert!(parse_places("<html>").is_err());
    }

    #[test]
    fn test_parse_route_geometry() {
        let body = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 1200.5,
                "geometry": {"type": "LineString", "coordinates": [[122.5, 10.7], [122.52, 10.71], [122.55, 10.71]]}
            }]
        }"#;

        let path = parse_route_geometry(body).unwrap().unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], Coordinate::new(10.7, 122.5));
        assert_eq!(path[2], Coordinate::new(10.71, 122.55));
    }

    #[test]
    fn test_parse_route_geometry_no_route() {
        assert_eq!(parse_route_geometry(r#"{"code": "NoRoute", "routes": []}"#).unwrap(), None);
    }

    #[tokio::test]
    async fn test_route_needs_two_waypoints() {
        let client = client();
        assert_eq!(client.route(&[]).await, None);
        assert_eq!(client.route(&[Coordinate::default()]).await, None);
    }

    #[tokio::test]
    async fn test_blank_query_skips_request() {
        assert!(client().search("   ", None).await.is_empty());
    }
}
