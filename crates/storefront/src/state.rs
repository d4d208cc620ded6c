//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use cedars_core::Service;
use cedars_store::DocumentStore;

use crate::catalog_feed::CatalogFeed;
use crate::config::StorefrontConfig;
use crate::prefs::FilePrefStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn DocumentStore>,
    catalog: CatalogFeed,
    prefs: Mutex<FilePrefStore>,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        store: Arc<dyn DocumentStore>,
        catalog: CatalogFeed,
        prefs: FilePrefStore,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                catalog,
                prefs: Mutex::new(prefs),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    /// Current normalized catalog snapshot.
    #[must_use]
    pub fn catalog(&self) -> Vec<Service> {
        self.inner.catalog.borrow().clone()
    }

    /// Lock the preference store.
    #[must_use]
    pub fn prefs(&self) -> MutexGuard<'_, FilePrefStore> {
        self.inner
            .prefs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
