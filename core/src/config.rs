//! Pool configuration.
//!
//! A [`Config`] can only be obtained by validating a [`ConfigCandidate`], so
//! every `Config` value in the system satisfies the range constraints below:
//!
//! - every field is strictly positive
//! - `max_ticket_capacity <= total_tickets`
//! - `ticket_release_rate <= max_ticket_capacity`
//! - `ticket_release_rate <= total_tickets`
//!
//! The release and retrieval rates are pacing parameters for surrounding
//! scheduling logic. They are stored and reported but the pool itself does
//! not enforce them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed key of the singleton configuration record.
pub const CONFIG_KEY: i64 = 1;

/// Reasons a configuration candidate is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `total_tickets` was zero or negative.
    #[error("The total number of tickets must exceed 0.")]
    NonPositiveTotalTickets,

    /// `max_ticket_capacity` was zero or negative.
    #[error("The maximum capacity must be more than 0.")]
    NonPositiveMaxCapacity,

    /// `ticket_release_rate` was zero or negative.
    #[error("The ticket release rate must exceed 0.")]
    NonPositiveReleaseRate,

    /// `customer_retrieval_rate` was zero or negative.
    #[error("The customer retrieval rate must be more than 0.")]
    NonPositiveRetrievalRate,

    /// `max_ticket_capacity` was larger than `total_tickets`.
    #[error("Max capacity cannot exceed total tickets.")]
    CapacityExceedsTotal,

    /// `ticket_release_rate` was larger than `max_ticket_capacity`.
    #[error("Ticket release rate cannot exceed max capacity.")]
    ReleaseRateExceedsCapacity,

    /// `ticket_release_rate` was larger than `total_tickets`.
    #[error("Ticket release rate cannot exceed total tickets.")]
    ReleaseRateExceedsTotal,
}

/// Unvalidated configuration values, as received from a caller or read back
/// from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigCandidate {
    /// Lifetime ceiling on released tickets
    pub total_tickets: i64,
    /// Ceiling on simultaneously available tickets
    pub max_ticket_capacity: i64,
    /// Vendor release pacing
    pub ticket_release_rate: i64,
    /// Customer retrieval pacing
    pub customer_retrieval_rate: i64,
}

impl ConfigCandidate {
    /// Check the candidate and turn it into a [`Config`].
    ///
    /// Field positivity is checked first, in declaration order, then the
    /// cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] the candidate violates.
    pub const fn validate(self) -> Result<Config, ConfigError> {
        if self.total_tickets <= 0 {
            return Err(ConfigError::NonPositiveTotalTickets);
        }
        if self.max_ticket_capacity <= 0 {
            return Err(ConfigError::NonPositiveMaxCapacity);
        }
        if self.ticket_release_rate <= 0 {
            return Err(ConfigError::NonPositiveReleaseRate);
        }
        if self.customer_retrieval_rate <= 0 {
            return Err(ConfigError::NonPositiveRetrievalRate);
        }
        if self.max_ticket_capacity > self.total_tickets {
            return Err(ConfigError::CapacityExceedsTotal);
        }
        if self.ticket_release_rate > self.max_ticket_capacity {
            return Err(ConfigError::ReleaseRateExceedsCapacity);
        }
        if self.ticket_release_rate > self.total_tickets {
            return Err(ConfigError::ReleaseRateExceedsTotal);
        }

        Ok(Config {
            total_tickets: self.total_tickets,
            max_ticket_capacity: self.max_ticket_capacity,
            ticket_release_rate: self.ticket_release_rate,
            customer_retrieval_rate: self.customer_retrieval_rate,
        })
    }
}

/// The active pool configuration.
///
/// Immutable once built. Replacing the configuration means storing a whole
/// new `Config`; there is no partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    total_tickets: i64,
    max_ticket_capacity: i64,
    ticket_release_rate: i64,
    customer_retrieval_rate: i64,
}

impl Config {
    /// Lifetime ceiling on released tickets.
    #[must_use]
    pub const fn total_tickets(&self) -> i64 {
        self.total_tickets
    }

    /// Ceiling on simultaneously available tickets.
    #[must_use]
    pub const fn max_ticket_capacity(&self) -> i64 {
        self.max_ticket_capacity
    }

    /// Vendor release pacing.
    #[must_use]
    pub const fn ticket_release_rate(&self) -> i64 {
        self.ticket_release_rate
    }

    /// Customer retrieval pacing.
    #[must_use]
    pub const fn customer_retrieval_rate(&self) -> i64 {
        self.customer_retrieval_rate
    }

    /// The unvalidated view of this config, e.g. for storage.
    #[must_use]
    pub const fn to_candidate(&self) -> ConfigCandidate {
        ConfigCandidate {
            total_tickets: self.total_tickets,
            max_ticket_capacity: self.max_ticket_capacity,
            ticket_release_rate: self.ticket_release_rate,
            customer_retrieval_rate: self.customer_retrieval_rate,
        }
    }
}

impl TryFrom<ConfigCandidate> for Config {
    type Error = ConfigError;

    fn try_from(candidate: ConfigCandidate) -> Result<Self, Self::Error> {
        candidate.validate()
    }
}
