//! The editor session: the one owner of the canonical dataset and selection.
//!
//! Every operation builds the next snapshot with the pure mutators, writes it
//! through the [`StateStore`] and only then commits it in memory. The store
//! writes an edit's keys as one unit, so a failed write leaves both the
//! session and the persisted state exactly as they were.

use opr_core::error::{OprError, Result};
use opr_core::exchange;
use opr_core::models::{CityField, Coordinate, Dataset, Route, RouteField, Selection, Waypoint, WaypointField};
use opr_core::mutations;
use opr_store::ports::KeyValueStore;
use opr_store::state::StateStore;

/// Editing session over a persisted dataset
pub struct EditorSession<S: KeyValueStore> {
    state: StateStore<S>,
    dataset: Dataset,
    selection: Selection,
    map_center: Coordinate,
    max_waypoints: usize,
}

impl<S: KeyValueStore> EditorSession<S> {
    /// Restore a session from `store`.
    ///
    /// The map centre starts at the city. A restored selection that points
    /// past the end of the dataset is dropped.
    pub fn open(store: S, max_waypoints: usize) -> Result<Self> {
        let state = StateStore::new(store);
        let dataset = state.load_dataset()?;
        let mut selection = state.load_selection()?;

        if let Some(route) = selection.route() {
            match dataset.route(route) {
                None => selection.clear_route(),
                Some(r) if selection.waypoint().is_some_and(|w| w >= r.waypoints.len()) => {
                    selection.clear_waypoint()
                }
                Some(_) => {}
            }
        }

        tracing::info!(
            routes = dataset.routes.len(),
            waypoints = dataset.waypoint_count(),
            "opened editor session"
        );

        Ok(Self {
            map_center: dataset.city.coordinate(),
            state,
            dataset,
            selection,
            max_waypoints,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn map_center(&self) -> Coordinate {
        self.map_center
    }

    pub fn max_waypoints(&self) -> usize {
        self.max_waypoints
    }

    pub fn state(&self) -> &StateStore<S> {
        &self.state
    }

    /// The selected route, if any
    pub fn selected_route(&self) -> Option<&Route> {
        self.selection.route().and_then(|i| self.dataset.route(i))
    }

    /// Waypoints of the selected route, empty when none is selected
    pub fn current_waypoints(&self) -> &[Waypoint] {
        self.selected_route().map(|r| r.waypoints.as_slice()).unwrap_or(&[])
    }

    // Routes

    /// Append a suggested route and select it. Returns its index.
    pub fn add_route(&mut self) -> Result<usize> {
        let (next, index) = mutations::add_route(&self.dataset);
        let mut selection = self.selection;
        selection.select_route(index);
        self.commit(Some(next), Some(selection))?;
        Ok(index)
    }

    pub fn delete_route(&mut self, index: usize) -> Result<()> {
        let next = mutations::delete_route(&self.dataset, index)?;
        let mut selection = self.selection;
        selection.on_route_deleted(index);
        self.commit(Some(next), Some(selection))
    }

    pub fn update_route(&mut self, index: usize, field: RouteField) -> Result<()> {
        let next = mutations::update_route_field(&self.dataset, index, field)?;
        self.commit(Some(next), None)
    }

    pub fn select_route(&mut self, index: usize) -> Result<()> {
        if self.dataset.route(index).is_none() {
            return Err(OprError::RouteNotFound { index, len: self.dataset.routes.len() });
        }
        let mut selection = self.selection;
        selection.select_route(index);
        self.commit(None, Some(selection))
    }

    pub fn clear_route_selection(&mut self) -> Result<()> {
        let mut selection = self.selection;
        selection.clear_route();
        self.commit(None, Some(selection))
    }

    // Waypoints of the selected route

    /// Append a waypoint at the current map centre and select it.
    ///
    /// Returns `Ok(None)` without touching anything when the route already
    /// holds the maximum number of waypoints.
    pub fn add_waypoint(&mut self) -> Result<Option<usize>> {
        let route = self.selected_route_index()?;
        let waypoints = &self.dataset.routes[route].waypoints;
        if waypoints.len() >= self.max_waypoints {
            tracing::debug!(route, limit = self.max_waypoints, "waypoint limit reached");
            return Ok(None);
        }

        let updated = mutations::add_waypoint(waypoints, self.map_center);
        let index = updated.len() - 1;
        let next = mutations::replace_waypoints(&self.dataset, route, updated)?;

        let mut selection = self.selection;
        selection.select_waypoint(index);
        self.commit(Some(next), Some(selection))?;
        Ok(Some(index))
    }

    pub fn delete_waypoint(&mut self, index: usize) -> Result<()> {
        let route = self.selected_route_index()?;
        let updated = mutations::delete_waypoint(&self.dataset.routes[route].waypoints, index)?;
        let next = mutations::replace_waypoints(&self.dataset, route, updated)?;

        let mut selection = self.selection;
        selection.on_waypoint_deleted(index);
        self.commit(Some(next), Some(selection))
    }

    pub fn update_waypoint(&mut self, index: usize, field: WaypointField) -> Result<()> {
        let route = self.selected_route_index()?;
        let updated =
            mutations::update_waypoint_field(&self.dataset.routes[route].waypoints, index, field)?;
        let next = mutations::replace_waypoints(&self.dataset, route, updated)?;
        self.commit(Some(next), None)
    }

    /// Set the position of a waypoint, as a marker drag does
    pub fn move_waypoint(&mut self, index: usize, to: Coordinate) -> Result<()> {
        let route = self.selected_route_index()?;
        let updated = mutations::move_waypoint(&self.dataset.routes[route].waypoints, index, to)?;
        let next = mutations::replace_waypoints(&self.dataset, route, updated)?;
        self.commit(Some(next), None)
    }

    pub fn select_waypoint(&mut self, index: usize) -> Result<()> {
        let route = self.selected_route_index()?;
        let len = self.dataset.routes[route].waypoints.len();
        if index >= len {
            return Err(OprError::WaypointNotFound { index, len });
        }
        let mut selection = self.selection;
        selection.select_waypoint(index);
        self.commit(None, Some(selection))
    }

    pub fn clear_waypoint_selection(&mut self) -> Result<()> {
        let mut selection = self.selection;
        selection.clear_waypoint();
        self.commit(None, Some(selection))
    }

    // City

    pub fn update_city(&mut self, field: CityField) -> Result<()> {
        let next = mutations::update_city_field(&self.dataset, field);
        self.commit(Some(next), None)
    }

    pub fn move_city(&mut self, to: Coordinate) -> Result<()> {
        let next = mutations::move_city(&self.dataset, to);
        self.commit(Some(next), None)
    }

    /// Record where the map camera is; new waypoints are placed here
    pub fn set_map_center(&mut self, center: Coordinate) {
        self.map_center = center;
    }

    // Exchange

    /// Replace the whole dataset, as an import does. Selection is untouched.
    pub fn replace_dataset(&mut self, dataset: Dataset) -> Result<()> {
        tracing::info!(routes = dataset.routes.len(), "replacing dataset");
        self.commit(Some(dataset), None)
    }

    pub fn export_json(&self) -> Result<String> {
        exchange::to_pretty_json(&self.dataset)
    }

    fn selected_route_index(&self) -> Result<usize> {
        let index = self.selection.route().ok_or(OprError::NoRouteSelected)?;
        if index >= self.dataset.routes.len() {
            return Err(OprError::RouteNotFound { index, len: self.dataset.routes.len() });
        }
        Ok(index)
    }

    fn commit(&mut self, dataset: Option<Dataset>, selection: Option<Selection>) -> Result<()> {
        self.state.save(dataset.as_ref(), selection.as_ref())?;

        if let Some(dataset) = dataset {
            self.dataset = dataset;
        }
        if let Some(selection) = selection {
            self.selection = selection;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opr_core::models::IslandGroup;
    use opr_store::memory::MemoryKeyValueStore;
    use opr_store::state::SELECTED_WAYPOINT_KEY;

    fn session() -> (EditorSession<MemoryKeyValueStore>, MemoryKeyValueStore) {
        let store = MemoryKeyValueStore::new();
        (EditorSession::open(store.clone(), 50).unwrap(), store)
    }

    #[test]
    fn test_opens_with_default_dataset() {
        let (session, _) = session();
        assert_eq!(session.dataset(), &Dataset::default());
        assert!(session.selection().is_empty());
        assert_eq!(session.map_center(), session.dataset().city.coordinate());
        assert!(session.current_waypoints().is_empty());
    }

    #[test]
    fn test_add_route_selects_it() {
        let (mut session, _) = session();
        session.add_route().unwrap();
        session.add_route().unwrap();
        let index = session.add_route().unwrap();

        assert_eq!(index, 2);
        assert_eq!(session.selection().route(), Some(2));
        assert_eq!(session.dataset().routes[2].route_code, "03");
        assert_eq!(session.dataset().routes[2].name, "Route 3");
    }

    #[test]
    fn test_waypoint_ops_need_selected_route() {
        let (mut session, _) = session();
        session.add_route().unwrap();
        session.clear_route_selection().unwrap();

        assert!(matches!(session.add_waypoint(), Err(OprError::NoRouteSelected)));
        assert!(matches!(session.select_waypoint(0), Err(OprError::NoRouteSelected)));
    }

    #[test]
    fn test_add_waypoint_uses_map_center_and_selects() {
        let (mut session, _) = session();
        session.add_route().unwrap();
        session.set_map_center(Coordinate::new(10.70, 122.55));

        let index = session.add_waypoint().unwrap();
        assert_eq!(index, Some(0));
        assert_eq!(session.selection().waypoint(), Some(0));
        assert_eq!(session.current_waypoints()[0].coordinate(), Coordinate::new(10.70, 122.55));
        assert_eq!(session.current_waypoints()[0].sequence, 1);
    }

    #[test]
    fn test_waypoint_cap_refuses_silently() {
        let store = MemoryKeyValueStore::new();
        let mut session = EditorSession::open(store.clone(), 3).unwrap();
        session.add_route().unwrap();
        for _ in 0..3 {
            assert!(session.add_waypoint().unwrap().is_some());
        }

        let writes = store.write_count();
        assert_eq!(session.add_waypoint().unwrap(), None);
        assert_eq!(session.current_waypoints().len(), 3);
        assert_eq!(store.write_count(), writes);
    }

    #[test]
    fn test_delete_selected_waypoint_clears_it() {
        let (mut session, _) = session();
        session.add_route().unwrap();
        session.add_waypoint().unwrap();
        session.add_waypoint().unwrap();
        session.select_waypoint(1).unwrap();

        session.delete_waypoint(1).unwrap();
        assert_eq!(session.selection().route(), Some(0));
        assert_eq!(session.selection().waypoint(), None);
        assert_eq!(session.current_waypoints().len(), 1);
    }

    #[test]
    fn test_delete_selected_route_clears_both() {
        let (mut session, _) = session();
        session.add_route().unwrap();
        session.add_waypoint().unwrap();

        session.delete_route(0).unwrap();
        assert!(session.selection().is_empty());
        assert_eq!(session.selection().waypoint(), None);
    }

    #[test]
    fn test_select_route_out_of_range() {
        let (mut session, _) = session();
        assert!(matches!(session.select_route(0), Err(OprError::RouteNotFound { .. })));
    }

    #[test]
    fn test_every_mutation_is_written_through() {
        let (mut session, store) = session();
        session.add_route().unwrap();
        session.update_city(CityField::IslandGroup(IslandGroup::Luzon)).unwrap();

        let reopened = EditorSession::open(store, 50).unwrap();
        assert_eq!(reopened.dataset(), session.dataset());
        assert_eq!(reopened.selection(), session.selection());
        assert_eq!(reopened.dataset().city.island_group, IslandGroup::Luzon);
    }

    #[test]
    fn test_failed_write_leaves_session_unchanged() {
        let (mut session, store) = session();
        session.add_route().unwrap();
        store.set_read_only(true);

        assert!(matches!(session.add_route(), Err(OprError::Storage { .. })));
        assert_eq!(session.dataset().routes.len(), 1);
        assert_eq!(session.selection().route(), Some(0));
    }

    #[test]
    fn test_failed_selection_write_leaves_store_unchanged() {
        let (mut session, store) = session();
        session.add_route().unwrap();
        store.fail_writes_to(Some(SELECTED_WAYPOINT_KEY));

        assert!(matches!(session.add_waypoint(), Err(OprError::Storage { .. })));
        assert!(session.current_waypoints().is_empty());
        assert_eq!(session.selection().waypoint(), None);

        store.fail_writes_to(None);
        let reopened = EditorSession::open(store, 50).unwrap();
        assert_eq!(reopened.dataset(), session.dataset());
        assert_eq!(reopened.selection(), session.selection());
    }

    #[test]
    fn test_failed_route_switch_keeps_waypoint_with_its_route() {
        let (mut session, store) = session();
        session.add_route().unwrap();
        session.add_route().unwrap();
        session.select_route(0).unwrap();
        session.add_waypoint().unwrap();
        assert_eq!(session.selection(), Selection::restore(Some(0), Some(0)));

        store.fail_writes_to(Some(SELECTED_WAYPOINT_KEY));
        assert!(session.select_route(1).is_err());
        store.fail_writes_to(None);

        let reopened = EditorSession::open(store, 50).unwrap();
        assert_eq!(reopened.selection(), Selection::restore(Some(0), Some(0)));
    }

    #[test]
    fn test_open_drops_dangling_selection() {
        let store = MemoryKeyValueStore::new();
        let state = StateStore::new(store.clone());
        state.save_selection(&Selection::restore(Some(4), Some(1))).unwrap();

        let session = EditorSession::open(store, 50).unwrap();
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_replace_dataset_keeps_selection() {
        let (mut session, _) = session();
        session.add_route().unwrap();

        let mut imported = Dataset::default();
        imported.city.name = "Bacolod".to_string();
        session.replace_dataset(imported.clone()).unwrap();

        assert_eq!(session.dataset(), &imported);
        assert_eq!(session.selection().route(), Some(0));
        assert!(session.selected_route().is_none());
    }
}
