//! Geocoding and directions port definitions

use async_trait::async_trait;
use opr_core::models::Coordinate;

use crate::models::GeocodeResult;

/// Port for free-text place search.
///
/// Implementations never fail: transport or parse problems are logged and
/// reported as an empty result list.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Search for `query`, most relevant first, at most
    /// [`MAX_RESULTS`](crate::models::MAX_RESULTS) matches
    ///
    /// # Arguments
    /// * `query` - Free-text address or landmark
    /// * `proximity` - Optional position to bias results towards
    async fn search(&self, query: &str, proximity: Option<Coordinate>) -> Vec<GeocodeResult>;
}

/// Port for road-following route geometry between ordered waypoints.
///
/// Returns `None` when no route is available, including on network failure.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn route(&self, waypoints: &[Coordinate]) -> Option<Vec<Coordinate>>;
}

#[async_trait]
impl<T: Geocoder + ?Sized> Geocoder for std::sync::Arc<T> {
    async fn search(&self, query: &str, proximity: Option<Coordinate>) -> Vec<GeocodeResult> {
        (**self).search(query, proximity).await
    }
}

#[async_trait]
impl<T: DirectionsProvider + ?Sized> DirectionsProvider for std::sync::Arc<T> {
    async fn route(&self, waypoints: &[Coordinate]) -> Option<Vec<Coordinate>> {
        (**self).route(waypoints).await
    }
}
