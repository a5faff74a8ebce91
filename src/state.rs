use std::sync::Arc;

use crate::config::AppConfig;
use crate::metrics::Metrics;

/// The shared application state.
///
/// Only read-only configuration and atomic counters live here. Every analysis
/// owns its own accumulator, so handlers never contend on a lock.
#[derive(Clone)]
pub struct AppState {
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// The application metrics.
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self { config: Arc::new(config), metrics: Metrics::new() }
    }
}
