//! Prometheus metrics for the ticket pool.
//!
//! `PoolManager` records through the helpers in this module; the exporter is
//! only installed when a [`MetricsServer`] is started, so recording is a
//! no-op in tests that never start one.
//!
//! # Example
//!
//! ```rust,no_run
//! use ticket_pool_runtime::metrics::MetricsServer;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut server = MetricsServer::new();
//! server.start()?;
//!
//! // Serve `server.render()` from an HTTP endpoint such as `/metrics`
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;
use ticket_pool_core::TicketPool;

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus recorder with a render handle.
#[derive(Default)]
pub struct MetricsServer {
    handle: Option<PrometheusHandle>,
}

impl MetricsServer {
    /// Create a metrics server that has not been started yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Register metric descriptions and install the Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// If a recorder is already installed (e.g. by another test), this logs a
    /// warning and leaves the server without a handle.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!("Metrics recorder installed");
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus text format.
    ///
    /// Returns `None` if the server hasn't been started.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    describe_counter!(
        "ticket_pool.tickets_added_total",
        "Total number of tickets released into the pool"
    );
    describe_counter!(
        "ticket_pool.tickets_purchased_total",
        "Total number of tickets purchased from the pool"
    );
    describe_counter!(
        "ticket_pool.rejections_total",
        "Rejected pool operations, labelled by reason"
    );
    describe_counter!(
        "ticket_pool.storage_failures_total",
        "Pool operations that failed on persistence"
    );
    describe_gauge!(
        "ticket_pool.available_tickets",
        "Tickets currently available for purchase"
    );
    describe_gauge!(
        "ticket_pool.released_tickets",
        "Tickets released over the pool's lifetime"
    );
    describe_histogram!(
        "ticket_pool.operation_duration_seconds",
        "Time spent in a pool operation, including persistence"
    );
}

/// Record a committed add.
pub(crate) fn record_added(quantity: i64, pool: &TicketPool) {
    metrics::counter!("ticket_pool.tickets_added_total").increment(as_count(quantity));
    record_pool(pool);
}

/// Record a committed purchase.
pub(crate) fn record_purchased(quantity: i64, pool: &TicketPool) {
    metrics::counter!("ticket_pool.tickets_purchased_total").increment(as_count(quantity));
    record_pool(pool);
}

/// Record a rejected or failed operation.
pub(crate) fn record_failure(operation: &'static str, reason: &'static str, operational: bool) {
    if operational {
        metrics::counter!("ticket_pool.storage_failures_total", "operation" => operation)
            .increment(1);
    } else {
        metrics::counter!(
            "ticket_pool.rejections_total",
            "operation" => operation,
            "reason" => reason
        )
        .increment(1);
    }
}

/// Record how long an operation took.
pub(crate) fn record_duration(operation: &'static str, elapsed: Duration) {
    metrics::histogram!("ticket_pool.operation_duration_seconds", "operation" => operation)
        .record(elapsed.as_secs_f64());
}

// Note: Precision loss acceptable for gauges (ticket counts < 2^52)
#[allow(clippy::cast_precision_loss)]
fn record_pool(pool: &TicketPool) {
    metrics::gauge!("ticket_pool.available_tickets").set(pool.available_tickets() as f64);
    metrics::gauge!("ticket_pool.released_tickets").set(pool.released_tickets() as f64);
}

fn as_count(quantity: i64) -> u64 {
    u64::try_from(quantity).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unstarted_server_renders_nothing() {
        let server = MetricsServer::new();
        assert!(server.handle().is_none());
        assert!(server.render().is_none());
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let pool = TicketPool::from_counts(3, 5).unwrap_or_default();
        record_added(5, &pool);
        record_purchased(2, &pool);
        record_failure("add_tickets", "capacity_exceeded", false);
        record_duration("add_tickets", Duration::from_millis(1));
    }

    #[test]
    fn test_negative_quantity_counts_as_zero() {
        assert_eq!(as_count(-4), 0);
        assert_eq!(as_count(4), 4);
    }
}
