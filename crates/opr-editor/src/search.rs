//! Debounced place search.
//!
//! Each keystroke calls [`SearchBox::begin`] and then drives the returned
//! request with [`SearchBox::run`]. A request only reaches the geocoder if no
//! newer one was begun during the quiet period, and its answer is kept only
//! if it is still the newest when it arrives.
//!
//! The result list sits behind an `RwLock` that is only held to clone or
//! swap the vector, and its guards are taken with `unwrap()`. The lock can
//! only be poisoned by a panic inside one of those short sections, which
//! leaves nothing meaningful to recover.

use opr_core::models::Coordinate;
use opr_geocode::models::GeocodeResult;
use opr_geocode::ports::Geocoder;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use crate::bridge::{Camera, WAYPOINT_ZOOM};

/// Queries shorter than this clear the result list instead of searching
pub const MIN_QUERY_CHARS: usize = 3;

/// One keystroke's worth of search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub id: u64,
    pub query: String,
}

/// Outcome of driving a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results were replaced
    Applied,
    /// Results were cleared because the query is too short
    Cleared,
    /// A newer request was begun; nothing changed
    Superseded,
}

/// Search box state. Safe to drive several requests concurrently.
pub struct SearchBox<G: Geocoder> {
    geocoder: Option<G>,
    debounce: Duration,
    latest: AtomicU64,
    results: RwLock<Vec<GeocodeResult>>,
}

impl<G: Geocoder> SearchBox<G> {
    /// Create a search box. Without a geocoder every search comes back empty.
    pub fn new(geocoder: Option<G>, debounce: Duration) -> Self {
        Self { geocoder, debounce, latest: AtomicU64::new(0), results: RwLock::new(Vec::new()) }
    }

    /// Register a new query, superseding every earlier one
    pub fn begin(&self, query: impl Into<String>) -> SearchRequest {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        SearchRequest { id, query: query.into() }
    }

    fn is_latest(&self, id: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == id
    }

    /// Wait out the quiet period, then search
    pub async fn run(&self, request: &SearchRequest, proximity: Option<Coordinate>) -> SearchOutcome {
        tokio::time::sleep(self.debounce).await;
        if !self.is_latest(request.id) {
            return SearchOutcome::Superseded;
        }

        if request.query.chars().count() < MIN_QUERY_CHARS {
            self.set_results(Vec::new());
            return SearchOutcome::Cleared;
        }

        let results = match &self.geocoder {
            Some(geocoder) => geocoder.search(&request.query, proximity).await,
            None => Vec::new(),
        };

        if !self.is_latest(request.id) {
            tracing::debug!(id = request.id, query = %request.query, "discarding stale search results");
            return SearchOutcome::Superseded;
        }
        tracing::debug!(query = %request.query, results = results.len(), "search results");
        self.set_results(results);
        SearchOutcome::Applied
    }

    /// `begin` and `run` in one step
    pub async fn search(&self, query: impl Into<String>, proximity: Option<Coordinate>) -> SearchOutcome {
        let request = self.begin(query);
        self.run(&request, proximity).await
    }

    pub fn results(&self) -> Vec<GeocodeResult> {
        self.results.read().unwrap().clone()
    }

    /// Pick result `index`: returns where the camera should go and clears
    /// the list. The dataset is not touched.
    pub fn choose(&self, index: usize) -> Option<Camera> {
        let mut results = self.results.write().unwrap();
        let chosen = results.get(index)?.coordinate;
        results.clear();
        // A later keystroke must not resurrect the list
        self.latest.fetch_add(1, Ordering::SeqCst);
        Some(Camera { center: chosen, zoom: WAYPOINT_ZOOM })
    }

    fn set_results(&self, results: Vec<GeocodeResult>) {
        *self.results.write().unwrap() = results;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingGeocoder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Geocoder for CountingGeocoder {
        async fn search(&self, query: &str, _proximity: Option<Coordinate>) -> Vec<GeocodeResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            vec![GeocodeResult::new(format!("{}, Iloilo City", query), query, Coordinate::new(10.7, 122.56))]
        }
    }

    fn search_box() -> (SearchBox<Arc<CountingGeocoder>>, Arc<CountingGeocoder>) {
        let geocoder = Arc::new(CountingGeocoder::default());
        (SearchBox::new(Some(geocoder.clone()), Duration::from_millis(300)), geocoder)
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_clears_without_lookup() {
        let (search, geocoder) = search_box();
        assert_eq!(search.search("Jaro", None).await, SearchOutcome::Applied);
        assert_eq!(search.results().len(), 1);

        assert_eq!(search.search("Ja", None).await, SearchOutcome::Cleared);
        assert!(search.results().is_empty());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystrokes_within_quiet_period_are_dropped() {
        let (search, geocoder) = search_box();
        let first = search.begin("Izn");
        let second = search.begin("Iznart");

        let (a, b) = tokio::join!(search.run(&first, None), search.run(&second, None));
        assert_eq!(a, SearchOutcome::Superseded);
        assert_eq!(b, SearchOutcome::Applied);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(search.results()[0].short_label, "Iznart");
    }

    #[tokio::test(start_paused = true)]
    async fn test_choose_returns_camera_and_clears() {
        let (search, _) = search_box();
        search.search("Iznart Street", None).await;

        let camera = search.choose(0).unwrap();
        assert_eq!(camera.center, Coordinate::new(10.7, 122.56));
        assert!(search.results().is_empty());
        assert!(search.choose(0).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_shared_across_tasks() {
        let (search, _) = search_box();
        let search = Arc::new(search);
        search.search("Iznart", None).await;

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let search = search.clone();
                tokio::spawn(async move { search.results().len() })
            })
            .collect();
        for reader in readers {
            assert_eq!(reader.await.unwrap(), 1);
        }
        assert!(search.choose(0).is_some());
        assert!(search.results().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_without_geocoder_results_are_empty() {
        let search = SearchBox::<CountingGeocoder>::new(None, Duration::from_millis(300));
        assert_eq!(search.search("Iznart", None).await, SearchOutcome::Applied);
        assert!(search.results().is_empty());
    }
}
