//! Application state shared by every handler.

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use ticket_pool_core::ActorRegistry;
use ticket_pool_runtime::PoolManager;

/// Handles to the pool manager, the actor registry and the metrics renderer.
///
/// Cheap to clone; everything is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// The single pool manager for this process
    pub manager: Arc<PoolManager>,
    /// Vendor/customer registration
    pub registry: Arc<dyn ActorRegistry>,
    /// Prometheus renderer, absent when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state without a metrics renderer.
    #[must_use]
    pub fn new(manager: Arc<PoolManager>, registry: Arc<dyn ActorRegistry>) -> Self {
        Self {
            manager,
            registry,
            metrics: None,
        }
    }

    /// Serve metrics from `handle` at `/metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("manager", &self.manager)
            .field("metrics_enabled", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}
