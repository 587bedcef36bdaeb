//! HTTP request handlers, one module per resource.

pub mod actors;
pub mod config;
pub mod health;
pub mod metrics;
pub mod tickets;

pub use health::{health_check, readiness_check};
