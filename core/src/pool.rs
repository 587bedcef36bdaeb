//! The bounded shared ticket pool.
//!
//! [`TicketPool`] is a plain value: both transitions take `&self` and return
//! the next pool state, leaving the receiver untouched. The caller decides
//! when the new state becomes visible, which lets `PoolManager` persist the
//! next state before swapping it in.
//!
//! Transitions are fail-fast. A rejected add or purchase returns immediately;
//! nothing ever waits for capacity or stock to appear.
//!
//! Invariants held by every value this module produces, given the `Config`
//! used for adds:
//!
//! - `0 <= available <= released`
//! - `available <= max_ticket_capacity`
//! - `released <= total_tickets`
//! - `released` never decreases

use crate::config::Config;
use crate::error::PoolError;
use serde::{Deserialize, Serialize};

/// Fixed key of the singleton pool record.
pub const POOL_KEY: i64 = 1;

/// Counter pair for the shared pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPool {
    available_tickets: i64,
    released_tickets: i64,
}

impl TicketPool {
    /// A fresh pool: nothing released, nothing available.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            available_tickets: 0,
            released_tickets: 0,
        }
    }

    /// Rebuild a pool from stored counters.
    ///
    /// Returns `None` if the counters cannot describe a valid pool
    /// (negative values, or more available than ever released).
    #[must_use]
    pub const fn from_counts(available_tickets: i64, released_tickets: i64) -> Option<Self> {
        if available_tickets < 0 || released_tickets < 0 || available_tickets > released_tickets {
            return None;
        }
        Some(Self {
            available_tickets,
            released_tickets,
        })
    }

    /// Tickets currently available for purchase.
    #[must_use]
    pub const fn available_tickets(&self) -> i64 {
        self.available_tickets
    }

    /// Tickets released over the pool's lifetime.
    #[must_use]
    pub const fn released_tickets(&self) -> i64 {
        self.released_tickets
    }

    /// `(available, released)`.
    #[must_use]
    pub const fn status(&self) -> (i64, i64) {
        (self.available_tickets, self.released_tickets)
    }

    /// Release `quantity` new tickets into the pool.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidQuantity`] if `quantity <= 0`
    /// - [`PoolError::CapacityExceeded`] if the pool would hold more than
    ///   `max_ticket_capacity` tickets or release more than `total_tickets`
    pub fn add(&self, quantity: i64, config: &Config) -> Result<Self, PoolError> {
        if quantity <= 0 {
            return Err(PoolError::InvalidQuantity { quantity });
        }

        let available = self.available_tickets.checked_add(quantity);
        let released = self.released_tickets.checked_add(quantity);

        match (available, released) {
            (Some(available), Some(released))
                if available <= config.max_ticket_capacity()
                    && released <= config.total_tickets() =>
            {
                Ok(Self {
                    available_tickets: available,
                    released_tickets: released,
                })
            }
            _ => Err(PoolError::CapacityExceeded {
                requested: quantity,
                available: self.available_tickets,
                max_capacity: config.max_ticket_capacity(),
                released: self.released_tickets,
                total_tickets: config.total_tickets(),
            }),
        }
    }

    /// Withdraw `quantity` tickets from the pool.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidQuantity`] if `quantity <= 0`
    /// - [`PoolError::InsufficientStock`] if fewer than `quantity` tickets
    ///   are available
    pub fn purchase(&self, quantity: i64) -> Result<Self, PoolError> {
        if quantity <= 0 {
            return Err(PoolError::InvalidQuantity { quantity });
        }
        if quantity > self.available_tickets {
            return Err(PoolError::InsufficientStock {
                requested: quantity,
                available: self.available_tickets,
            });
        }

        Ok(Self {
            available_tickets: self.available_tickets - quantity,
            released_tickets: self.released_tickets,
        })
    }

    /// Whether the counters satisfy the bounds of `config`.
    #[must_use]
    pub const fn fits(&self, config: &Config) -> bool {
        self.available_tickets <= config.max_ticket_capacity()
            && self.released_tickets <= config.total_tickets()
    }
}

/// Pool counters combined with the configured ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStatus {
    /// Tickets currently available for purchase
    pub available_tickets: i64,
    /// Tickets released over the pool's lifetime
    pub released_tickets: i64,
    /// Configured lifetime ceiling
    pub total_tickets: i64,
    /// Configured ceiling on available tickets
    pub max_ticket_capacity: i64,
}

impl PoolStatus {
    /// Compose a status report from the pool and the active config.
    #[must_use]
    pub const fn new(pool: &TicketPool, config: &Config) -> Self {
        Self {
            available_tickets: pool.available_tickets(),
            released_tickets: pool.released_tickets(),
            total_tickets: config.total_tickets(),
            max_ticket_capacity: config.max_ticket_capacity(),
        }
    }
}
