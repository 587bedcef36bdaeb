//! Configuration endpoints.
//!
//! All three return the stored configuration as camelCase JSON:
//!
//! ```json
//! {"totalTickets": 100, "maxTicketCapacity": 20, "ticketReleaseRate": 5, "customerRetrievalRate": 2}
//! ```

use crate::WebResult;
use crate::state::AppState;
use axum::{Json, extract::State};
use ticket_pool_core::{Config, ConfigCandidate};

/// Store the first configuration.
///
/// Repeating the call with identical values succeeds; different values get
/// 409.
///
/// # Endpoint
///
/// ```text
/// POST /config/init-config
/// ```
///
/// # Errors
///
/// 400 if validation fails, 409 if a different configuration exists or the
/// current pool does not fit, 503 on storage failure.
pub async fn init_config(
    State(state): State<AppState>,
    Json(candidate): Json<ConfigCandidate>,
) -> WebResult<Json<Config>> {
    Ok(Json(state.manager.initialize_config(candidate).await?))
}

/// Replace the configuration. Pool counters are kept.
///
/// # Endpoint
///
/// ```text
/// POST /config/set-config
/// ```
///
/// # Errors
///
/// 400 if validation fails, 409 if the current pool does not fit, 503 on
/// storage failure.
pub async fn set_config(
    State(state): State<AppState>,
    Json(candidate): Json<ConfigCandidate>,
) -> WebResult<Json<Config>> {
    Ok(Json(state.manager.reset_config(candidate).await?))
}

/// Read the active configuration.
///
/// # Endpoint
///
/// ```text
/// GET /config/get-config
/// ```
///
/// # Errors
///
/// 404 if none has been stored, 503 on storage failure.
pub async fn get_config(State(state): State<AppState>) -> WebResult<Json<Config>> {
    Ok(Json(state.manager.current_config().await?))
}
