//! Map/form synchronization bridge.
//!
//! The map holds no state of its own. [`MapBridge::plan`] derives what the
//! map should show from the dataset and selection, [`MapBridge::apply`]
//! pushes that to a [`MapView`], and [`MapBridge::handle_event`] turns map
//! gestures back into session operations.
//!
//! Route lines come from a [`DirectionsProvider`]. Each lookup is tagged with
//! a request id and its answer is drawn only if no newer lookup was issued in
//! the meantime.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use opr_core::error::Result;
use opr_core::models::{Coordinate, Dataset, Selection};
use opr_geocode::ports::DirectionsProvider;
use opr_store::ports::KeyValueStore;
use serde::Serialize;

use crate::session::EditorSession;

/// Zoom used when recentring on the city
pub const CITY_ZOOM: f64 = 13.0;
/// Zoom used when flying to a selected waypoint
pub const WAYPOINT_ZOOM: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "index")]
pub enum MarkerId {
    City,
    /// Waypoint at this position in the selected route
    Waypoint(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerColor {
    Selected,
    Default,
    City,
}

impl MarkerColor {
    pub fn hex(&self) -> &'static str {
        match self {
            MarkerColor::Selected => "#3b82f6",
            MarkerColor::Default => "#10b981",
            MarkerColor::City => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: MarkerId,
    pub coordinate: Coordinate,
    pub label: String,
    pub color: MarkerColor,
    pub draggable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub center: Coordinate,
    pub zoom: f64,
}

/// Pending directions lookup for the active route
#[derive(Debug, Clone, PartialEq)]
pub struct LineRequest {
    pub id: u64,
    pub waypoints: Vec<Coordinate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineUpdate {
    Unchanged,
    Clear,
    Request(LineRequest),
}

/// Everything the map has to do to catch up with the model
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub markers: Vec<Marker>,
    pub camera: Option<Camera>,
    pub line: LineUpdate,
}

/// Drawing surface driven by the bridge
pub trait MapView {
    /// Replace all markers
    fn show_markers(&mut self, markers: &[Marker]);

    fn draw_line(&mut self, path: &[Coordinate]);

    fn clear_line(&mut self);

    fn fly_to(&mut self, camera: Camera);
}

/// Gestures reported by the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    DragEnd { marker: MarkerId, coordinate: Coordinate },
    MarkerClicked(MarkerId),
    CameraPanned(Coordinate),
}

/// A [`MapView`] that just remembers the last state it was given
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingView {
    pub markers: Vec<Marker>,
    pub line: Option<Vec<Coordinate>>,
    pub camera: Option<Camera>,
    pub flights: usize,
}

impl MapView for RecordingView {
    fn show_markers(&mut self, markers: &[Marker]) {
        self.markers = markers.to_vec();
    }

    fn draw_line(&mut self, path: &[Coordinate]) {
        self.line = Some(path.to_vec());
    }

    fn clear_line(&mut self) {
        self.line = None;
    }

    fn fly_to(&mut self, camera: Camera) {
        self.camera = Some(camera);
        self.flights += 1;
    }
}

/// Markers for the current model: one per waypoint of the selected route,
/// plus the city marker while picking the city from the map
pub fn markers(dataset: &Dataset, selection: Selection, city_mode: bool) -> Vec<Marker> {
    let waypoints = selection
        .route()
        .and_then(|i| dataset.route(i))
        .map(|r| r.waypoints.as_slice())
        .unwrap_or(&[]);

    let mut markers: Vec<Marker> = waypoints
        .iter()
        .enumerate()
        .map(|(i, wp)| Marker {
            id: MarkerId::Waypoint(i),
            coordinate: wp.coordinate(),
            label: wp.sequence.to_string(),
            color: if selection.waypoint() == Some(i) {
                MarkerColor::Selected
            } else {
                MarkerColor::Default
            },
            draggable: true,
        })
        .collect();

    if city_mode {
        markers.push(Marker {
            id: MarkerId::City,
            coordinate: dataset.city.coordinate(),
            label: dataset.city.name.clone(),
            color: MarkerColor::City,
            draggable: true,
        });
    }
    markers
}

#[derive(Debug, Clone, PartialEq)]
struct Observed {
    city: Coordinate,
    waypoint: Option<(usize, usize)>,
    line: (Option<usize>, Vec<Coordinate>),
}

pub struct MapBridge<D: DirectionsProvider> {
    directions: Option<D>,
    city_mode: bool,
    observed: Option<Observed>,
    latest_line_request: u64,
    line: Vec<Coordinate>,
}

impl<D: DirectionsProvider> MapBridge<D> {
    /// Create a bridge. Without a directions provider no route line is drawn.
    pub fn new(directions: Option<D>) -> Self {
        Self {
            directions,
            city_mode: false,
            observed: None,
            latest_line_request: 0,
            line: Vec::new(),
        }
    }

    pub fn city_mode(&self) -> bool {
        self.city_mode
    }

    /// Enter or leave "set city from map" mode
    pub fn set_city_mode(&mut self, active: bool) {
        tracing::debug!(active, "city mode");
        self.city_mode = active;
    }

    pub fn toggle_city_mode(&mut self) {
        self.set_city_mode(!self.city_mode);
    }

    /// The route line currently drawn
    pub fn line(&self) -> &[Coordinate] {
        &self.line
    }

    /// Work out what changed since the previous plan.
    ///
    /// The first plan always recentres on the city and requests the line.
    pub fn plan(&mut self, dataset: &Dataset, selection: Selection) -> RenderPlan {
        let route = selection.route().and_then(|i| dataset.route(i).map(|r| (i, r)));
        let now = Observed {
            city: dataset.city.coordinate(),
            waypoint: selection.route().zip(selection.waypoint()),
            line: (route.map(|(i, _)| i), route.map(|(_, r)| r.coordinates()).unwrap_or_default()),
        };
        let previous = self.observed.replace(now.clone());

        let city_changed = previous.as_ref().map_or(true, |p| p.city != now.city);
        let waypoint_changed = now.waypoint.is_some()
            && previous.as_ref().map_or(true, |p| p.waypoint != now.waypoint);
        let line_changed = previous.as_ref().map_or(true, |p| p.line != now.line);

        let waypoint_target = now
            .waypoint
            .filter(|_| waypoint_changed)
            .and_then(|(_, w)| route.and_then(|(_, r)| r.waypoints.get(w)))
            .map(|wp| Camera { center: wp.coordinate(), zoom: WAYPOINT_ZOOM });
        let camera = waypoint_target.or_else(|| {
            city_changed.then_some(Camera { center: now.city, zoom: CITY_ZOOM })
        });

        let line = if !line_changed {
            LineUpdate::Unchanged
        } else {
            self.latest_line_request += 1;
            let points = now.line.1;
            if points.len() < 2 {
                LineUpdate::Clear
            } else {
                LineUpdate::Request(LineRequest { id: self.latest_line_request, waypoints: points })
            }
        };

        RenderPlan { markers: markers(dataset, selection, self.city_mode), camera, line }
    }

    /// Push markers, camera and an immediate line clear to `view`
    pub fn apply<V: MapView>(&mut self, plan: &RenderPlan, view: &mut V) {
        view.show_markers(&plan.markers);
        if let Some(camera) = plan.camera {
            view.fly_to(camera);
        }
        if plan.line == LineUpdate::Clear {
            self.line.clear();
            view.clear_line();
        }
    }

    /// Ask the directions provider for the road path of `request`
    pub async fn fetch_line(&self, request: &LineRequest) -> Option<Vec<Coordinate>> {
        match &self.directions {
            Some(directions) => directions.route(&request.waypoints).await,
            None => None,
        }
    }

    /// Draw the answer to request `id` if it is still the latest one.
    ///
    /// Returns whether the view was touched. `None` means no route is
    /// available and clears the line.
    pub fn finish_line<V: MapView>(&mut self, id: u64, path: Option<Vec<Coordinate>>, view: &mut V) -> bool {
        if id != self.latest_line_request {
            tracing::debug!(id, latest = self.latest_line_request, "discarding stale route line");
            return false;
        }

        match path {
            Some(path) => {
                view.draw_line(&path);
                self.line = path;
            }
            None => {
                view.clear_line();
                self.line.clear();
            }
        }
        true
    }

    /// Plan, apply and resolve the route line in one go
    pub async fn sync<S: KeyValueStore, V: MapView>(&mut self, session: &EditorSession<S>, view: &mut V) {
        let plan = self.plan(session.dataset(), session.selection());
        self.apply(&plan, view);
        if let LineUpdate::Request(request) = plan.line {
            let path = self.fetch_line(&request).await;
            self.finish_line(request.id, path, view);
        }
    }

    /// Translate a map gesture into a session operation
    pub fn handle_event<S: KeyValueStore>(
        &mut self,
        event: MapEvent,
        session: &mut EditorSession<S>,
    ) -> Result<()> {
        match event {
            MapEvent::DragEnd { marker: MarkerId::City, coordinate } => {
                session.move_city(coordinate)?;
                self.set_city_mode(false);
            }
            MapEvent::DragEnd { marker: MarkerId::Waypoint(index), coordinate } => {
                session.move_waypoint(index, coordinate)?;
            }
            MapEvent::MarkerClicked(MarkerId::Waypoint(index)) => {
                session.select_waypoint(index)?;
            }
            MapEvent::MarkerClicked(MarkerId::City) => {}
            MapEvent::CameraPanned(center) => session.set_map_center(center),
        }
        Ok(())
    }

    /// The current scene as GeoJSON: one point per marker and the route line
    pub fn scene(&self, dataset: &Dataset, selection: Selection) -> FeatureCollection {
        let mut features: Vec<Feature> = markers(dataset, selection, self.city_mode)
            .into_iter()
            .map(|marker| {
                let mut properties = JsonObject::new();
                properties.insert("kind".to_string(), match marker.id {
                    MarkerId::City => "city".into(),
                    MarkerId::Waypoint(_) => "waypoint".into(),
                });
                properties.insert("label".to_string(), marker.label.into());
                properties.insert("marker-color".to_string(), marker.color.hex().into());
                feature(Value::Point(marker.coordinate.to_lng_lat().to_vec()), properties)
            })
            .collect();

        if self.line.len() >= 2 {
            let mut properties = JsonObject::new();
            properties.insert("kind".to_string(), "route".into());
            let positions = self.line.iter().map(|c| c.to_lng_lat().to_vec()).collect();
            features.push(feature(Value::LineString(positions), properties));
        }

        FeatureCollection { bbox: None, features, foreign_members: None }
    }
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
