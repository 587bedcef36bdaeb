//! HTTP API for the ticket pool.
//!
//! A thin axum shell over [`PoolManager`](ticket_pool_runtime::PoolManager):
//! handlers parse camelCase JSON, check the request discriminator, call the
//! manager and map [`PoolError`](ticket_pool_core::PoolError) to a status
//! code through [`AppError`].
//!
//! # Example
//!
//! ```ignore
//! use ticket_pool_web::{AppState, build_router};
//!
//! let state = AppState::new(manager, registry);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, build_router(state)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod settings;
pub mod state;

pub use error::AppError;
pub use middleware::{REQUEST_ID_HEADER, RequestId};
pub use router::build_router;
pub use settings::{ServerSettings, Settings};
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
