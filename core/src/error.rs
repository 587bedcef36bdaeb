//! Errors returned by pool operations.
//!
//! Three families, all surfaced to the caller unchanged:
//!
//! - **Input errors**: [`PoolError::UnknownActor`], [`PoolError::InvalidQuantity`],
//!   [`PoolError::InvalidConfig`]
//! - **Business-rule violations**: [`PoolError::CapacityExceeded`],
//!   [`PoolError::InsufficientStock`], [`PoolError::ConfigConflict`],
//!   [`PoolError::ConfigAlreadyInitialized`]
//! - **Operational failures**: [`PoolError::Storage`]
//!
//! None of them leave a partial state change or a transaction log entry
//! behind.

use crate::config::ConfigError;
use crate::environment::StorageError;
use crate::ids::Actor;
use thiserror::Error;

/// Errors from ticket pool operations.
#[derive(Error, Debug)]
pub enum PoolError {
    /// The requested ticket count was zero or negative.
    #[error("Ticket count must be greater than 0, got {quantity}")]
    InvalidQuantity {
        /// The rejected count
        quantity: i64,
    },

    /// Adding the tickets would exceed the capacity or the lifetime total.
    #[error(
        "Cannot add {requested} tickets: {available} available of {max_capacity} capacity, \
         {released} released of {total_tickets} total"
    )]
    CapacityExceeded {
        /// Tickets the vendor tried to add
        requested: i64,
        /// Tickets currently available
        available: i64,
        /// Configured ceiling on available tickets
        max_capacity: i64,
        /// Tickets released so far
        released: i64,
        /// Configured lifetime ceiling on released tickets
        total_tickets: i64,
    },

    /// Not enough tickets are available for the purchase.
    #[error("Cannot purchase {requested} tickets: only {available} available")]
    InsufficientStock {
        /// Tickets the customer tried to purchase
        requested: i64,
        /// Tickets currently available
        available: i64,
    },

    /// The vendor or customer id does not exist.
    #[error("Unknown {0}")]
    UnknownActor(Actor),

    /// No configuration has been stored yet.
    #[error("Configuration not found.")]
    ConfigMissing,

    /// The pool record has never been created.
    #[error("Ticket pool has not been initialized")]
    PoolUninitialized,

    /// The configuration candidate failed validation.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    /// A replacement configuration is incompatible with the current pool.
    #[error(
        "Configuration conflicts with current pool: {available} available, {released} released"
    )]
    ConfigConflict {
        /// Tickets currently available
        available: i64,
        /// Tickets released so far
        released: i64,
    },

    /// A different configuration already exists.
    #[error("Configuration is already initialized with different values")]
    ConfigAlreadyInitialized,

    /// A collaborator failed to read or persist state.
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl PoolError {
    /// Short machine-readable label, used for metrics and error codes.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidQuantity { .. } => "invalid_quantity",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::UnknownActor(_) => "unknown_actor",
            Self::ConfigMissing => "config_missing",
            Self::PoolUninitialized => "pool_uninitialized",
            Self::InvalidConfig(_) => "invalid_config",
            Self::ConfigConflict { .. } => "config_conflict",
            Self::ConfigAlreadyInitialized => "config_already_initialized",
            Self::Storage(_) => "storage_failure",
        }
    }

    /// Whether the error is an operational failure rather than a rejection.
    #[must_use]
    pub const fn is_operational(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::VendorId;

    #[test]
    fn test_capacity_message_has_detail() {
        let err = PoolError::CapacityExceeded {
            requested: 10,
            available: 15,
            max_capacity: 20,
            released: 15,
            total_tickets: 100,
        };
        assert_eq!(
            err.to_string(),
            "Cannot add 10 tickets: 15 available of 20 capacity, 15 released of 100 total"
        );
    }

    #[test]
    fn test_reason_labels() {
        assert_eq!(
            PoolError::UnknownActor(Actor::Vendor(VendorId::new(1))).reason(),
            "unknown_actor"
        );
        assert_eq!(PoolError::ConfigMissing.reason(), "config_missing");
        assert!(PoolError::Storage(StorageError::Database("down".into())).is_operational());
        assert!(!PoolError::ConfigMissing.is_operational());
    }

    #[test]
    fn test_invalid_config_is_transparent() {
        let err = PoolError::from(ConfigError::CapacityExceedsTotal);
        assert_eq!(err.to_string(), "Max capacity cannot exceed total tickets.");
    }
}
