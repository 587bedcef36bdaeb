//! Transaction log entries.
//!
//! One [`TransactionEntry`] is written for every committed add or purchase,
//! and none for a rejected attempt. Entries are immutable; insertion order is
//! the audit order.

use crate::ids::{Actor, CustomerId, VendorId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a committed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// A vendor released tickets into the pool
    Add,
    /// A customer withdrew tickets from the pool
    Purchase,
}

/// Audit record of one committed pool mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEntry {
    vendor_id: Option<VendorId>,
    customer_id: Option<CustomerId>,
    tickets_added: i64,
    tickets_purchased: i64,
    timestamp: DateTime<Utc>,
}

impl TransactionEntry {
    /// Record of a vendor adding `quantity` tickets.
    #[must_use]
    pub const fn added(vendor_id: VendorId, quantity: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            vendor_id: Some(vendor_id),
            customer_id: None,
            tickets_added: quantity,
            tickets_purchased: 0,
            timestamp,
        }
    }

    /// Record of a customer purchasing `quantity` tickets.
    #[must_use]
    pub const fn purchased(
        customer_id: CustomerId,
        quantity: i64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            vendor_id: None,
            customer_id: Some(customer_id),
            tickets_added: 0,
            tickets_purchased: quantity,
            timestamp,
        }
    }

    /// Vendor behind an add, `None` for purchases.
    #[must_use]
    pub const fn vendor_id(&self) -> Option<VendorId> {
        self.vendor_id
    }

    /// Customer behind a purchase, `None` for adds.
    #[must_use]
    pub const fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id
    }

    /// Tickets added (0 for purchases).
    #[must_use]
    pub const fn tickets_added(&self) -> i64 {
        self.tickets_added
    }

    /// Tickets purchased (0 for adds).
    #[must_use]
    pub const fn tickets_purchased(&self) -> i64 {
        self.tickets_purchased
    }

    /// When the mutation was committed.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Whether this entry records an add or a purchase.
    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        if self.vendor_id.is_some() {
            TransactionKind::Add
        } else {
            TransactionKind::Purchase
        }
    }

    /// The actor behind the mutation.
    #[must_use]
    pub const fn actor(&self) -> Option<Actor> {
        match (self.vendor_id, self.customer_id) {
            (Some(vendor), _) => Some(Actor::Vendor(vendor)),
            (None, Some(customer)) => Some(Actor::Customer(customer)),
            (None, None) => None,
        }
    }

    /// Signed effect on the available count: positive for adds, negative for
    /// purchases.
    #[must_use]
    pub const fn available_delta(&self) -> i64 {
        self.tickets_added - self.tickets_purchased
    }
}
