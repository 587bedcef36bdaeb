//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use ticket_pool_core::PoolError;

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// Liveness check. Does not touch storage.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Readiness response.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// Whether storage answered
    pub ready: bool,
    /// Whether a configuration has been stored
    pub configured: bool,
}

/// Readiness check: reads the configuration through the pool manager.
///
/// # Status Codes
///
/// - 200 OK: storage reachable (configured or not)
/// - 503 Service Unavailable: storage failed
///
/// # Endpoint
///
/// ```text
/// GET /health/ready
/// ```
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let (status, ready, configured) = match state.manager.current_config().await {
        Ok(_) => (StatusCode::OK, true, true),
        Err(PoolError::ConfigMissing) => (StatusCode::OK, true, false),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, false, false)
        }
    };

    (status, Json(ReadinessResponse { ready, configured }))
}
