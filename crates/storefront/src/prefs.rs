//! File-backed shopper preference store.
//!
//! A small key-value store persisted as one JSON object on disk, read once
//! at startup and rewritten wholesale on every change. Persistence is
//! fire-and-forget: a write failure is logged and the in-memory state stays
//! authoritative for the life of the process. Unparsable or missing state
//! falls back to defaults instead of failing startup.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use cedars_core::prefs::{FavoriteIds, LastOrder, Preferences, keys};
use cedars_core::{PlanType, ServiceId};

/// JSON-file-backed preference store.
pub struct FilePrefStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl FilePrefStore {
    /// Open the store, loading existing state if the file parses.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        let values = std::fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str::<Map<String, Value>>(&raw).ok())
            .unwrap_or_else(|| {
                tracing::debug!(path = %path.display(), "no usable preference file, starting fresh");
                Map::new()
            });
        Self {
            path: path.to_path_buf(),
            values,
        }
    }

    /// Read a key, falling back to `T`'s default when the key is absent or
    /// its stored value no longer parses.
    pub fn get<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.values
            .get(key)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    /// Write a key and persist the whole store.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => {
                self.values.insert(key.to_owned(), json);
                self.persist();
            }
            Err(error) => tracing::warn!(key, %error, "preference value not serializable"),
        }
    }

    /// Remove a key and persist the whole store.
    pub fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.persist();
        }
    }

    fn persist(&self) {
        let payload = match serde_json::to_string_pretty(&self.values) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(%error, "preference state not serializable");
                return;
            }
        };
        if let Err(error) = std::fs::write(&self.path, payload) {
            // in-memory state stays authoritative
            tracing::warn!(path = %self.path.display(), %error, "preference write failed");
        }
    }

    // ====== Typed accessors ======

    #[must_use]
    pub fn theme_dark(&self) -> bool {
        self.values
            .get(keys::THEME_DARK)
            .and_then(Value::as_bool)
            .unwrap_or(Preferences::default().theme_dark)
    }

    pub fn set_theme_dark(&mut self, dark: bool) {
        self.set(keys::THEME_DARK, &dark);
    }

    #[must_use]
    pub fn preferred_plan_type(&self) -> Option<PlanType> {
        self.get(keys::PREFERRED_PLAN_TYPE)
    }

    pub fn set_preferred_plan_type(&mut self, plan_type: Option<PlanType>) {
        match plan_type {
            Some(plan_type) => self.set(keys::PREFERRED_PLAN_TYPE, &plan_type),
            None => self.remove(keys::PREFERRED_PLAN_TYPE),
        }
    }

    #[must_use]
    pub fn favorites(&self) -> FavoriteIds {
        self.get(keys::FAVORITE_SERVICE_IDS)
    }

    /// Toggle a favorite; returns whether the id is a favorite afterwards.
    pub fn toggle_favorite(&mut self, id: ServiceId) -> bool {
        let mut favorites = self.favorites();
        let now_favorite = favorites.toggle(id);
        self.set(keys::FAVORITE_SERVICE_IDS, &favorites);
        now_favorite
    }

    #[must_use]
    pub fn last_order(&self) -> Option<LastOrder> {
        self.get(keys::LAST_ORDER)
    }

    pub fn set_last_order(&mut self, order: &LastOrder) {
        self.set(keys::LAST_ORDER, order);
    }
}
