//! # Ticket Pool Testing
//!
//! Testing utilities for the ticket pool.
//!
//! This crate provides:
//! - In-memory implementations of every collaborator trait, with failure
//!   injection
//! - A deterministic clock
//! - [`PoolHarness`], a builder that wires a `PoolManager` to in-memory
//!   collaborators and keeps handles to them for assertions
//!
//! ## Example
//!
//! ```
//! use ticket_pool_core::{CustomerId, VendorId};
//! use ticket_pool_testing::PoolHarness;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let harness = PoolHarness::new()
//!     .with_config(100, 20, 5, 2)
//!     .with_vendor(VendorId::new(1))
//!     .with_customer(CustomerId::new(1))
//!     .build();
//!
//! harness.manager.add_tickets(VendorId::new(1), 15).await?;
//! assert_eq!(harness.log.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod harness;
pub mod stores;

use chrono::{DateTime, Utc};
use ticket_pool_core::Clock;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making log timestamps reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ticket_pool_testing::mocks::FixedClock;
    /// use ticket_pool_core::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from many tests; only the first call installs.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticket_pool_runtime=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use harness::PoolHarness;
pub use mocks::{FixedClock, test_clock};
pub use stores::{
    FailureSwitch, InMemoryConfigStore, InMemoryDirectory, InMemoryLedger,
    InMemoryPoolRepository, InMemoryTransactionLog,
};
