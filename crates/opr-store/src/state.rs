//! Typed access to the persisted editor state.
//!
//! Layout (key → JSON value):
//!
//! | key                     | value                          |
//! |-------------------------|--------------------------------|
//! | `opr-data`              | dataset snapshot               |
//! | `opr-selected-route`    | route index or `null`          |
//! | `opr-selected-waypoint` | waypoint index or `null`       |
//! | `opr-api-key`           | map/geocoding access token     |

use opr_core::error::Result;
use opr_core::models::{Dataset, Selection};
use serde::de::DeserializeOwned;

use crate::ports::KeyValueStore;

pub const DATASET_KEY: &str = "opr-data";
pub const SELECTED_ROUTE_KEY: &str = "opr-selected-route";
pub const SELECTED_WAYPOINT_KEY: &str = "opr-selected-waypoint";
pub const ACCESS_TOKEN_KEY: &str = "opr-api-key";

#[derive(Debug, Clone)]
pub struct StateStore<S: KeyValueStore> {
    inner: S,
}

impl<S: KeyValueStore> StateStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Load the dataset, falling back to the default one.
    ///
    /// A stored snapshot that no longer parses is logged and replaced by the
    /// default rather than failing startup.
    pub fn load_dataset(&self) -> Result<Dataset> {
        Ok(self.load_json::<Dataset>(DATASET_KEY)?.unwrap_or_default())
    }

    pub fn save_dataset(&self, dataset: &Dataset) -> Result<()> {
        self.inner.set(DATASET_KEY, &serde_json::to_string(dataset)?)
    }

    pub fn load_selection(&self) -> Result<Selection> {
        let route = self.load_json::<Option<usize>>(SELECTED_ROUTE_KEY)?.flatten();
        let waypoint = self.load_json::<Option<usize>>(SELECTED_WAYPOINT_KEY)?.flatten();
        Ok(Selection::restore(route, waypoint))
    }

    pub fn save_selection(&self, selection: &Selection) -> Result<()> {
        self.save(None, Some(selection))
    }

    /// Write the dataset and/or selection as one unit.
    ///
    /// When any key fails to write, the keys already written are put back to
    /// their previous values, so a reader never sees half of an edit.
    pub fn save(&self, dataset: Option<&Dataset>, selection: Option<&Selection>) -> Result<()> {
        let mut entries = Vec::with_capacity(3);
        if let Some(dataset) = dataset {
            entries.push((DATASET_KEY, serde_json::to_string(dataset)?));
        }
        if let Some(selection) = selection {
            entries.push((SELECTED_ROUTE_KEY, serde_json::to_string(&selection.route())?));
            entries.push((SELECTED_WAYPOINT_KEY, serde_json::to_string(&selection.waypoint())?));
        }
        self.write_all(&entries)
    }

    pub fn load_access_token(&self) -> Result<Option<String>> {
        Ok(self.load_json::<String>(ACCESS_TOKEN_KEY)?.filter(|t| !t.trim().is_empty()))
    }

    pub fn save_access_token(&self, token: Option<&str>) -> Result<()> {
        match token {
            Some(token) => self.inner.set(ACCESS_TOKEN_KEY, &serde_json::to_string(token)?),
            None => self.inner.remove(ACCESS_TOKEN_KEY),
        }
    }

    fn write_all(&self, entries: &[(&'static str, String)]) -> Result<()> {
        let mut written: Vec<(&'static str, Option<String>)> = Vec::with_capacity(entries.len());
        for &(key, ref value) in entries {
            let result = self.inner.get(key).and_then(|previous| {
                self.inner.set(key, value)?;
                Ok(previous)
            });
            match result {
                Ok(previous) => written.push((key, previous)),
                Err(e) => {
                    self.roll_back(written);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn roll_back(&self, written: Vec<(&'static str, Option<String>)>) {
        for (key, previous) in written.into_iter().rev() {
            let restored = match previous {
                Some(value) => self.inner.set(key, &value),
                None => self.inner.remove(key),
            };
            if let Err(e) = restored {
                tracing::warn!(key, error = %e, "could not roll back partial state write");
            }
        }
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.inner.get(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring unreadable persisted value");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryKeyValueStore;
    use opr_core::mutations::add_route;

    #[test]
    fn test_defaults_when_empty() {
        let state = StateStore::new(MemoryKeyValueStore::new());
        assert_eq!(state.load_dataset().unwrap(), Dataset::default());
        assert_eq!(state.load_selection().unwrap(), Selection::default());
        assert_eq!(state.load_access_token().unwrap(), None);
    }

    #[test]
    fn test_dataset_round_trip() {
        let state = StateStore::new(MemoryKeyValueStore::new());
        let (dataset, _) = add_route(&Dataset::default());

        state.save_dataset(&dataset).unwrap();
        assert_eq!(state.load_dataset().unwrap(), dataset);
    }

    #[test]
    fn test_selection_stored_as_number_or_null() {
        let store = MemoryKeyValueStore::new();
        let state = StateStore::new(store.clone());

        let mut selection = Selection::default();
        selection.select_route(2);
        state.save_selection(&selection).unwrap();

        assert_eq!(store.get(SELECTED_ROUTE_KEY).unwrap().as_deref(), Some("2"));
        assert_eq!(store.get(SELECTED_WAYPOINT_KEY).unwrap().as_deref(), Some("null"));
        assert_eq!(state.load_selection().unwrap(), selection);
    }

    #[test]
    fn test_failed_selection_write_keeps_previous_selection() {
        let store = MemoryKeyValueStore::new();
        let state = StateStore::new(store.clone());
        let before = Selection::restore(Some(0), Some(3));
        state.save_selection(&before).unwrap();

        store.fail_writes_to(Some(SELECTED_WAYPOINT_KEY));
        let mut after = before;
        after.select_route(1);
        assert!(state.save_selection(&after).is_err());

        store.fail_writes_to(None);
        assert_eq!(state.load_selection().unwrap(), before);
    }

    #[test]
    fn test_failed_save_removes_keys_that_were_absent() {
        let store = MemoryKeyValueStore::new();
        let state = StateStore::new(store.clone());
        store.fail_writes_to(Some(SELECTED_ROUTE_KEY));

        let (dataset, index) = add_route(&Dataset::default());
        let mut selection = Selection::default();
        selection.select_route(index);
        assert!(state.save(Some(&dataset), Some(&selection)).is_err());

        assert_eq!(store.get(DATASET_KEY).unwrap(), None);
        assert_eq!(state.load_dataset().unwrap(), Dataset::default());
    }

    #[test]
    fn test_corrupt_dataset_falls_back_to_default() {
        let store = MemoryKeyValueStore::new();
        store.set(DATASET_KEY, "{ truncated").unwrap();

        let state = StateStore::new(store);
        assert_eq!(state.load_dataset().unwrap(), Dataset::default());
    }

    #[test]
    fn test_access_token_round_trip() {
        let store = MemoryKeyValueStore::new();
        let state = StateStore::new(store.clone());

        state.save_access_token(Some("pk.test")).unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("\"pk.test\""));
        assert_eq!(state.load_access_token().unwrap().as_deref(), Some("pk.test"));

        state.save_access_token(None).unwrap();
        assert_eq!(state.load_access_token().unwrap(), None);
    }
}
