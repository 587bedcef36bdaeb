//! Collaborator traits, injected into `PoolManager` via [`PoolEnvironment`].
//!
//! Every external dependency of the pool sits behind a trait so the same
//! orchestration runs against `PostgreSQL` in production and against the
//! in-memory doubles of `ticket-pool-testing` in tests.
//!
//! # Dyn Compatibility
//!
//! The async traits return [`BoxFuture`] instead of using `async fn` so they
//! can be held as `Arc<dyn Trait>`.

use crate::config::Config;
use crate::ids::{CustomerId, VendorId};
use crate::pool::TicketPool;
use crate::transaction::TransactionEntry;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by storage collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Database connection or query failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Stored data could not be decoded into a domain value.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// The backend is temporarily unavailable.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Clock trait - abstracts time operations for testability
///
/// # Examples
///
/// ```
/// use ticket_pool_core::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let earlier = clock.now();
/// assert!(clock.now() >= earlier);
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Existence checks for actors.
pub trait IdentityLookup: Send + Sync {
    /// Whether a vendor with this id exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the lookup itself fails.
    fn vendor_exists(&self, id: VendorId) -> BoxFuture<'_, Result<bool, StorageError>>;

    /// Whether a customer with this id exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the lookup itself fails.
    fn customer_exists(&self, id: CustomerId) -> BoxFuture<'_, Result<bool, StorageError>>;
}

/// Storage for the singleton configuration.
pub trait ConfigStore: Send + Sync {
    /// The active configuration, `None` if none has been stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the read fails.
    fn current_config(&self) -> BoxFuture<'_, Result<Option<Config>, StorageError>>;

    /// Replace the active configuration wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails.
    fn save_config(&self, config: Config) -> BoxFuture<'_, Result<(), StorageError>>;
}

/// Storage for the singleton pool counters.
pub trait PoolRepository: Send + Sync {
    /// The stored pool, `None` if it has never been created.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the read fails.
    fn load_pool(&self) -> BoxFuture<'_, Result<Option<TicketPool>, StorageError>>;

    /// Persist the pool counters, creating the record if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails.
    fn save_pool(&self, pool: TicketPool) -> BoxFuture<'_, Result<(), StorageError>>;
}

/// The append-only audit log, written together with the pool state.
///
/// A committed transition is one unit: the new pool counters and the log
/// entry recording them are stored together or not at all.
pub trait PoolLedger: Send + Sync {
    /// Persist `pool` and append `entry` atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the unit cannot be stored. Neither write
    /// is then visible.
    fn commit(
        &self,
        pool: TicketPool,
        entry: TransactionEntry,
    ) -> BoxFuture<'_, Result<(), StorageError>>;
}

/// Dependencies of `PoolManager`.
///
/// Cheap to clone: every collaborator is reference counted.
#[derive(Clone)]
pub struct PoolEnvironment {
    /// Source of log timestamps
    pub clock: Arc<dyn Clock>,
    /// Vendor/customer existence checks
    pub identities: Arc<dyn IdentityLookup>,
    /// Configuration storage
    pub configs: Arc<dyn ConfigStore>,
    /// Pool counter storage
    pub pools: Arc<dyn PoolRepository>,
    /// Atomic pool-and-log commits
    pub ledger: Arc<dyn PoolLedger>,
}

impl PoolEnvironment {
    /// Bundle the collaborators.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        identities: Arc<dyn IdentityLookup>,
        configs: Arc<dyn ConfigStore>,
        pools: Arc<dyn PoolRepository>,
        ledger: Arc<dyn PoolLedger>,
    ) -> Self {
        Self {
            clock,
            identities,
            configs,
            pools,
            ledger,
        }
    }
}

impl std::fmt::Debug for PoolEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolEnvironment").finish_non_exhaustive()
    }
}
