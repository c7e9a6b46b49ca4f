//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::DiaryConfig;
use crate::db::{DiaryStore, ExerciseCatalog, Stores, UserStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// stores and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DiaryConfig,
    stores: Stores,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Service configuration
    /// * `stores` - Store handles for the selected backend
    #[must_use]
    pub fn new(config: DiaryConfig, stores: Stores) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, stores }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &DiaryConfig {
        &self.inner.config
    }

    /// Get the full set of store handles.
    #[must_use]
    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    /// Get the diary store.
    #[must_use]
    pub fn diary(&self) -> &dyn DiaryStore {
        self.inner.stores.diary.as_ref()
    }

    /// Get the exercise catalog.
    #[must_use]
    pub fn exercises(&self) -> &dyn ExerciseCatalog {
        self.inner.stores.exercises.as_ref()
    }

    /// Get the user store.
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.stores.users.as_ref()
    }
}
