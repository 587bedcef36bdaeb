//! HTTP mapping for pool and registry errors.
//!
//! Every handler returns [`AppError`] on failure. Rejections carry a stable
//! upper-case `code` (the error's metrics reason) and the domain message;
//! storage failures are logged in full and reported with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use ticket_pool_core::{PoolError, RegistryError};

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(state): State<AppState>) -> Result<Json<PoolStatus>, AppError> {
///     Ok(Json(state.manager.status().await?))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.into(),
            source: None,
        }
    }

    /// Attach the underlying error for logging.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    /// Create a 503 error for a storage failure.
    ///
    /// The message is generic; attach the cause with [`Self::with_source`].
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message, "STORAGE_FAILURE")
    }

    /// The response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The machine-readable code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            match &self.source {
                Some(source) => tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    error = %source,
                    "Request failed"
                ),
                None => tracing::error!(status = %self.status, code = %self.code, "Request failed"),
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<PoolError> for AppError {
    fn from(err: PoolError) -> Self {
        let status = match &err {
            PoolError::InvalidQuantity { .. }
            | PoolError::InvalidConfig(_)
            | PoolError::UnknownActor(_)
            | PoolError::CapacityExceeded { .. }
            | PoolError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            PoolError::ConfigMissing | PoolError::PoolUninitialized => StatusCode::NOT_FOUND,
            PoolError::ConfigConflict { .. } | PoolError::ConfigAlreadyInitialized => {
                StatusCode::CONFLICT
            }
            PoolError::Storage(_) => {
                return Self::unavailable("Ticket storage is unavailable, try again later")
                    .with_source(err.into());
            }
        };

        Self::new(status, err.to_string(), err.reason().to_uppercase())
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::DuplicateEmail(_) => {
                Self::new(StatusCode::CONFLICT, err.to_string(), "DUPLICATE_EMAIL")
            }
            RegistryError::Invalid(_) => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string(), "INVALID_REGISTRATION")
            }
            RegistryError::Storage(_) => {
                Self::unavailable("Directory storage is unavailable, try again later")
                    .with_source(err.into())
            }
        }
    }
}
