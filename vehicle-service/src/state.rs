//! Application state shared across handlers

use std::sync::Arc;

use crate::config::Config;

/// Shared handler state
///
/// Generic over the vehicle store so handlers run the same against Postgres
/// and against an in-memory store.
#[derive(Clone)]
pub struct AppState<S> {
    config: Arc<Config>,
    store: S,
}

impl<S> AppState<S> {
    /// Create state from configuration and a store
    pub fn new(config: Config, store: S) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the vehicle store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Page size used when a list request gives none
    ///
    /// Never below 1, even for a `Config` built in code without validation.
    pub fn default_limit(&self) -> u64 {
        self.config.pagination.default_limit.max(1)
    }
}
