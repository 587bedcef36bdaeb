//! Vendor and customer registration.

use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use ticket_pool_core::{CustomerId, NewActor, VendorId};

/// Id of a newly registered vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRegistered {
    /// Assigned id
    pub vendor_id: VendorId,
}

/// Id of a newly registered customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRegistered {
    /// Assigned id
    pub customer_id: CustomerId,
}

/// Register a vendor.
///
/// # Endpoint
///
/// ```text
/// POST /vendors
/// {"username": "acme", "email": "sales@acme.test", "mobileNo": 771234567}
/// ```
///
/// # Errors
///
/// 400 on a blank username or email, 409 if the email is taken, 503 on
/// storage failure.
pub async fn register_vendor(
    State(state): State<AppState>,
    Json(actor): Json<NewActor>,
) -> Result<(StatusCode, Json<VendorRegistered>), AppError> {
    let vendor_id = state.registry.register_vendor(actor).await?;
    Ok((StatusCode::CREATED, Json(VendorRegistered { vendor_id })))
}

/// Register a customer.
///
/// # Endpoint
///
/// ```text
/// POST /customers
/// {"username": "alice", "email": "alice@example.com"}
/// ```
///
/// # Errors
///
/// 400 on a blank username or email, 409 if the email is taken, 503 on
/// storage failure.
pub async fn register_customer(
    State(state): State<AppState>,
    Json(actor): Json<NewActor>,
) -> Result<(StatusCode, Json<CustomerRegistered>), AppError> {
    let customer_id = state.registry.register_customer(actor).await?;
    Ok((StatusCode::CREATED, Json(CustomerRegistered { customer_id })))
}
