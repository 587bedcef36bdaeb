//! # Ticket Pool Runtime
//!
//! The imperative shell around the pure pool transitions of
//! `ticket-pool-core`:
//!
//! - [`PoolManager`]: owns the singleton pool behind one async mutex,
//!   resolves actors, persists state and appends audit entries
//! - [`metrics`]: Prometheus instrumentation for pool operations
//!
//! # Concurrency
//!
//! All pool operations, status reads included, are serialised through a
//! single `tokio::sync::Mutex`. The lock is held across the check and the
//! atomic commit of pool state plus log entry; neither waits on pool
//! conditions, so the lock is always released promptly.
//!
//! Transitions are fail-fast: an add that does not fit or a purchase that
//! cannot be served is rejected immediately instead of waiting.

pub mod manager;
pub mod metrics;

pub use manager::PoolManager;
pub use metrics::{MetricsError, MetricsServer};
