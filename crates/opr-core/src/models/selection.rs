//! Active route / active waypoint tracking.
//!
//! The waypoint index only has meaning relative to the selected route, so
//! every transition that changes or drops the route also drops the waypoint.
//!
//! Indices are positions, not ids. Deleting an entity *before* the selected
//! one leaves the numeric selection untouched, so it may now name the entity
//! that shifted into that slot.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    route: Option<usize>,
    waypoint: Option<usize>,
}

impl Selection {
    /// Restore a selection, dropping a waypoint that has no route to belong to
    pub fn restore(route: Option<usize>, waypoint: Option<usize>) -> Self {
        Self { route, waypoint: route.and(waypoint) }
    }

    pub fn route(&self) -> Option<usize> {
        self.route
    }

    pub fn waypoint(&self) -> Option<usize> {
        self.waypoint
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_none()
    }

    /// Select a route. Always clears the waypoint selection.
    pub fn select_route(&mut self, index: usize) {
        tracing::debug!(route = index, "select route");
        self.route = Some(index);
        self.waypoint = None;
    }

    /// Select a waypoint of the current route.
    ///
    /// Returns `false` and leaves the selection unchanged when no route is
    /// selected.
    pub fn select_waypoint(&mut self, index: usize) -> bool {
        if self.route.is_none() {
            tracing::debug!(waypoint = index, "ignoring waypoint selection without a route");
            return false;
        }
        tracing::debug!(waypoint = index, "select waypoint");
        self.waypoint = Some(index);
        true
    }

    pub fn clear_route(&mut self) {
        self.route = None;
        self.waypoint = None;
    }

    pub fn clear_waypoint(&mut self) {
        self.waypoint = None;
    }

    /// Apply the effect of deleting the route at `index`
    pub fn on_route_deleted(&mut self, index: usize) {
        if self.route == Some(index) {
            self.clear_route();
        }
    }

    /// Apply the effect of deleting waypoint `index` of the selected route
    pub fn on_waypoint_deleted(&mut self, index: usize) {
        if self.waypoint == Some(index) {
            self.clear_waypoint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_selection_is_empty() {
        let selection = Selection::default();
        assert_eq!(selection.route(), None);
        assert_eq!(selection.waypoint(), None);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_restore_drops_orphan_waypoint() {
        let selection = Selection::restore(None, Some(2));
        assert_eq!(selection.waypoint(), None);

        let selection = Selection::restore(Some(1), Some(2));
        assert_eq!(selection.route(), Some(1));
        assert_eq!(selection.waypoint(), Some(2));
    }

    #[test]
    fn test_select_route_clears_waypoint() {
        let mut selection = Selection::restore(Some(0), Some(4));
        selection.select_route(1);
        assert_eq!(selection.route(), Some(1));
        assert_eq!(selection.waypoint(), None);

        // Re-selecting the same route also clears it
        selection.select_waypoint(2);
        selection.select_route(1);
        assert_eq!(selection.waypoint(), None);
    }

    #[test]
    fn test_select_waypoint_requires_route() {
        let mut selection = Selection::default();
        assert!(!selection.select_waypoint(0));
        assert_eq!(selection.waypoint(), None);

        selection.select_route(0);
        assert!(selection.select_waypoint(3));
        assert_eq!(selection.waypoint(), Some(3));
    }

    #[test]
    fn test_deleting_selected_route_clears_both() {
        let mut selection = Selection::restore(Some(2), Some(1));
        selection.on_route_deleted(2);
        assert_eq!(selection, Selection::default());
    }

    #[test]
    fn test_deleting_selected_waypoint_keeps_route() {
        let mut selection = Selection::restore(Some(2), Some(1));
        selection.on_waypoint_deleted(1);
        assert_eq!(selection.route(), Some(2));
        assert_eq!(selection.waypoint(), None);
    }

    #[test]
    fn test_deleting_other_entities_keeps_numeric_selection() {
        let mut selection = Selection::restore(Some(2), Some(3));

        // An earlier route shifts the selected one down, but the index stays put
        selection.on_route_deleted(0);
        assert_eq!(selection.route(), Some(2));

        selection.on_waypoint_deleted(0);
        assert_eq!(selection.waypoint(), Some(3));
    }
}
