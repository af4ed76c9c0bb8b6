//! Import with coordinate enrichment.
//!
//! A document is parsed as a whole. Waypoints with a zero latitude or
//! longitude are then looked up one at a time, biased towards the city,
//! and the first match fills in their position. Nothing reaches the
//! session unless the document parsed.

use opr_core::error::Result;
use opr_core::exchange;
use opr_core::models::{Coordinate, Dataset};
use opr_geocode::ports::Geocoder;
use opr_store::ports::KeyValueStore;

use crate::session::EditorSession;

/// Progress notifications emitted while enriching
#[derive(Debug, Clone, PartialEq)]
pub enum LookupEvent {
    /// Number of lookups about to run
    Planned { total: usize },
    Started { route: usize, waypoint: usize, query: String },
    Resolved { route: usize, waypoint: usize, coordinate: Coordinate },
    NotFound { route: usize, waypoint: usize },
}

/// Result of an import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub dataset: Dataset,
    /// Waypoints whose coordinates were filled in
    pub enriched: usize,
    /// Lookups performed
    pub lookups: usize,
}

impl ImportReport {
    pub fn summary(&self) -> String {
        if self.enriched > 0 {
            format!("JSON imported with {} waypoint(s) geocoded", self.enriched)
        } else {
            "JSON imported successfully".to_string()
        }
    }
}

pub struct ImportPipeline<G: Geocoder> {
    geocoder: Option<G>,
}

impl<G: Geocoder> ImportPipeline<G> {
    /// Create a pipeline. Without a geocoder documents are imported as-is.
    pub fn new(geocoder: Option<G>) -> Self {
        Self { geocoder }
    }

    /// Parse and enrich `text` without touching any session
    pub async fn prepare(&self, text: &str) -> Result<ImportReport> {
        self.prepare_with(text, |_| {}).await
    }

    /// Like [`prepare`](Self::prepare), reporting each lookup to `observer`
    pub async fn prepare_with<F>(&self, text: &str, mut observer: F) -> Result<ImportReport>
    where
        F: FnMut(LookupEvent),
    {
        let mut dataset = exchange::parse_dataset(text)?;
        let mut report = ImportReport { dataset: Dataset::default(), enriched: 0, lookups: 0 };

        let Some(geocoder) = &self.geocoder else {
            tracing::debug!("no geocoder configured, importing without enrichment");
            report.dataset = dataset;
            return Ok(report);
        };

        let pending = pending_lookups(&dataset);
        observer(LookupEvent::Planned { total: pending.len() });

        let proximity = dataset.city.coordinate();
        for (route, waypoint, query) in pending {
            observer(LookupEvent::Started { route, waypoint, query: query.clone() });
            report.lookups += 1;

            let results = geocoder.search(&query, Some(proximity)).await;
            match results.first() {
                Some(best) => {
                    let target = &mut dataset.routes[route].waypoints[waypoint];
                    target.latitude = best.coordinate.latitude;
                    target.longitude = best.coordinate.longitude;
                    report.enriched += 1;
                    observer(LookupEvent::Resolved { route, waypoint, coordinate: best.coordinate });
                }
                None => {
                    tracing::debug!(route, waypoint, %query, "no geocoding match");
                    observer(LookupEvent::NotFound { route, waypoint });
                }
            }
        }

        tracing::info!(lookups = report.lookups, enriched = report.enriched, "enriched import");
        report.dataset = dataset;
        Ok(report)
    }

    /// Parse, enrich and replace the session's dataset
    pub async fn import<S: KeyValueStore>(
        &self,
        text: &str,
        session: &mut EditorSession<S>,
    ) -> Result<ImportReport> {
        self.import_with(text, session, |_| {}).await
    }

    pub async fn import_with<S, F>(
        &self,
        text: &str,
        session: &mut EditorSession<S>,
        observer: F,
    ) -> Result<ImportReport>
    where
        S: KeyValueStore,
        F: FnMut(LookupEvent),
    {
        let report = self.prepare_with(text, observer).await?;
        session.replace_dataset(report.dataset.clone())?;
        Ok(report)
    }
}

/// Waypoints that need a lookup, as `(route, waypoint, query)`
pub fn pending_lookups(dataset: &Dataset) -> Vec<(usize, usize, String)> {
    dataset
        .routes
        .iter()
        .enumerate()
        .flat_map(|(r, route)| {
            route.waypoints.iter().enumerate().filter_map(move |(w, wp)| {
                if !wp.needs_geocoding() {
                    return None;
                }
                let query = wp.geocode_query();
                (!query.is_empty()).then_some((r, w, query))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opr_core::models::{Route, Waypoint};

    #[test]
    fn test_summary() {
        let mut report = ImportReport { dataset: Dataset::default(), enriched: 0, lookups: 2 };
        assert_eq!(report.summary(), "JSON imported successfully");
        report.enriched = 2;
        assert_eq!(report.summary(), "JSON imported with 2 waypoint(s) geocoded");
    }

    #[test]
    fn test_pending_lookups() {
        let mut dataset = Dataset::default();
        let mut route = Route::suggested(1);

        let mut located = Waypoint::new(1, Coordinate::new(10.7, 122.5));
        located.street = "Iznart".to_string();
        let mut half = Waypoint::new(2, Coordinate::new(10.7, 0.0));
        half.street = "  Iznart St ".to_string();
        half.destination = String::new();
        let mut blank = Waypoint::new(3, Coordinate::default());
        blank.street = " ".to_string();
        blank.destination = String::new();

        route.waypoints = vec![located, half, blank];
        dataset.routes.push(route);

        assert_eq!(pending_lookups(&dataset), vec![(0, 1, "Iznart St".to_string())]);
    }
}
