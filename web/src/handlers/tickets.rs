//! Ticket endpoints: vendor adds, customer purchases, pool status.
//!
//! Request bodies carry a `type` discriminator that must match the endpoint
//! (`"add"` or `"purchase"`, case-insensitive). A mismatch or a non-positive
//! `count` is rejected with 400 before the pool manager is called.

use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use ticket_pool_core::{CustomerId, PoolError, PoolStatus, TicketPool, VendorId};

/// Body of `POST /tickets/add-tickets`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTicketsRequest {
    /// Vendor releasing the tickets
    pub vendor_id: VendorId,
    /// Number of tickets
    pub count: i64,
    /// Must be `"add"`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Body of `POST /tickets/purchase-tickets`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseTicketsRequest {
    /// Customer buying the tickets
    pub customer_id: CustomerId,
    /// Number of tickets
    pub count: i64,
    /// Must be `"purchase"`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Result of a committed add or purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketsResponse {
    /// Human-readable outcome
    pub message: String,
    /// Tickets available after the operation
    pub available_tickets: i64,
    /// Tickets released after the operation
    pub released_tickets: i64,
}

impl TicketsResponse {
    fn new(message: &str, pool: TicketPool) -> Self {
        Self {
            message: message.to_string(),
            available_tickets: pool.available_tickets(),
            released_tickets: pool.released_tickets(),
        }
    }
}

/// Release tickets into the pool.
///
/// # Endpoint
///
/// ```text
/// POST /tickets/add-tickets
/// {"vendorId": 1, "count": 15, "type": "add"}
/// ```
///
/// # Errors
///
/// 400 on a wrong `type`, a non-positive count, an unknown vendor or a
/// capacity violation; 404 if no configuration exists; 503 on storage failure.
pub async fn add_tickets(
    State(state): State<AppState>,
    Json(request): Json<AddTicketsRequest>,
) -> Result<Json<TicketsResponse>, AppError> {
    expect_kind(request.kind.as_deref(), "add")?;
    expect_positive(request.count)?;

    let pool = state
        .manager
        .add_tickets(request.vendor_id, request.count)
        .await?;
    Ok(Json(TicketsResponse::new("Tickets added successfully.", pool)))
}

/// Withdraw tickets from the pool.
///
/// # Endpoint
///
/// ```text
/// POST /tickets/purchase-tickets
/// {"customerId": 1, "count": 5, "type": "purchase"}
/// ```
///
/// # Errors
///
/// 400 on a wrong `type`, a non-positive count, an unknown customer or
/// insufficient stock; 404 if no configuration exists; 503 on storage failure.
pub async fn purchase_tickets(
    State(state): State<AppState>,
    Json(request): Json<PurchaseTicketsRequest>,
) -> Result<Json<TicketsResponse>, AppError> {
    expect_kind(request.kind.as_deref(), "purchase")?;
    expect_positive(request.count)?;

    let pool = state
        .manager
        .purchase_tickets(request.customer_id, request.count)
        .await?;
    Ok(Json(TicketsResponse::new("Tickets purchased successfully.", pool)))
}

/// Current counters and configured ceilings.
///
/// # Endpoint
///
/// ```text
/// GET /tickets/status
/// {"availableTickets": 10, "releasedTickets": 15, "totalTickets": 100, "maxTicketCapacity": 20}
/// ```
///
/// # Errors
///
/// 404 if the configuration or the pool does not exist yet; 503 on storage
/// failure.
pub async fn pool_status(State(state): State<AppState>) -> Result<Json<PoolStatus>, AppError> {
    Ok(Json(state.manager.status().await?))
}

fn expect_kind(kind: Option<&str>, expected: &str) -> Result<(), AppError> {
    match kind {
        Some(kind) if kind.eq_ignore_ascii_case(expected) => Ok(()),
        _ => Err(AppError::bad_request(format!(
            "Invalid type. Only '{expected}' is allowed."
        ))),
    }
}

fn expect_positive(count: i64) -> Result<(), AppError> {
    if count > 0 {
        Ok(())
    } else {
        Err(PoolError::InvalidQuantity { quantity: count }.into())
    }
}
