//! In-memory collaborators for fast, deterministic tests.
//!
//! Each store carries a [`FailureSwitch`] so tests can make the next write
//! (or every write after the first `n`) fail with a [`StorageError`].
//! [`InMemoryLedger`] commits into a pool repository and a log together,
//! consulting both switches before writing either.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only follows a panicking test

use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, RwLock};
use ticket_pool_core::{
    ActorRegistry, Config, ConfigStore, CustomerId, IdentityLookup, NewActor, PoolLedger,
    PoolRepository, RegistryError, StorageError, TicketPool, TransactionEntry, VendorId,
};

/// Injectable storage failure.
///
/// Starts healthy. [`FailureSwitch::fail_always`] fails every call;
/// [`FailureSwitch::fail_after`] lets `n` calls through, then fails.
#[derive(Debug)]
pub struct FailureSwitch {
    failing: AtomicBool,
    // Successes left before failing; negative means unlimited.
    remaining: AtomicI64,
}

impl Default for FailureSwitch {
    fn default() -> Self {
        Self::new()
    }
}

impl FailureSwitch {
    /// A switch that never fails.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            failing: AtomicBool::new(false),
            remaining: AtomicI64::new(-1),
        }
    }

    /// Fail every subsequent call.
    pub fn fail_always(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Let `successes` calls through, then fail every call.
    pub fn fail_after(&self, successes: i64) {
        self.failing.store(false, Ordering::SeqCst);
        self.remaining.store(successes.max(0), Ordering::SeqCst);
    }

    /// Stop failing.
    pub fn heal(&self) {
        self.failing.store(false, Ordering::SeqCst);
        self.remaining.store(-1, Ordering::SeqCst);
    }

    /// Consume one call.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the switch is tripped.
    pub fn check(&self, operation: &str) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("{operation}: injected failure")));
        }

        // Each allowed call takes exactly one success from the budget.
        let taken = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| match remaining {
                0 => None,
                n if n > 0 => Some(n - 1),
                unlimited => Some(unlimited),
            });
        if taken.is_err() {
            self.failing.store(true, Ordering::SeqCst);
            return Err(StorageError::Unavailable(format!("{operation}: injected failure")));
        }
        Ok(())
    }
}

// ============================================================================
// Directory
// ============================================================================

#[derive(Debug, Default)]
struct Directory {
    vendors: HashMap<VendorId, NewActor>,
    customers: HashMap<CustomerId, NewActor>,
    next_id: i64,
}

impl Directory {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory vendor/customer directory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    inner: RwLock<Directory>,
    /// Failure injection for lookups
    pub failures: FailureSwitch,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a vendor with a fixed id.
    pub fn insert_vendor(&self, id: VendorId) {
        let mut dir = self.inner.write().unwrap();
        dir.next_id = dir.next_id.max(id.get());
        dir.vendors.insert(id, placeholder("vendor", id.get()));
    }

    /// Insert a customer with a fixed id.
    pub fn insert_customer(&self, id: CustomerId) {
        let mut dir = self.inner.write().unwrap();
        dir.next_id = dir.next_id.max(id.get());
        dir.customers.insert(id, placeholder("customer", id.get()));
    }

    /// Number of registered vendors.
    #[must_use]
    pub fn vendor_count(&self) -> usize {
        self.inner.read().unwrap().vendors.len()
    }

    /// Number of registered customers.
    #[must_use]
    pub fn customer_count(&self) -> usize {
        self.inner.read().unwrap().customers.len()
    }
}

fn placeholder(role: &str, id: i64) -> NewActor {
    NewActor {
        username: format!("{role}-{id}"),
        email: format!("{role}-{id}@example.com"),
        mobile_no: None,
    }
}

impl IdentityLookup for InMemoryDirectory {
    fn vendor_exists(&self, id: VendorId) -> BoxFuture<'_, Result<bool, StorageError>> {
        Box::pin(async move {
            self.failures.check("vendor_exists")?;
            Ok(self.inner.read().unwrap().vendors.contains_key(&id))
        })
    }

    fn customer_exists(&self, id: CustomerId) -> BoxFuture<'_, Result<bool, StorageError>> {
        Box::pin(async move {
            self.failures.check("customer_exists")?;
            Ok(self.inner.read().unwrap().customers.contains_key(&id))
        })
    }
}

impl ActorRegistry for InMemoryDirectory {
    fn register_vendor(&self, actor: NewActor) -> BoxFuture<'_, Result<VendorId, RegistryError>> {
        Box::pin(async move {
            actor.validate()?;
            self.failures.check("register_vendor")?;

            let mut dir = self.inner.write().unwrap();
            if dir.vendors.values().any(|v| v.email == actor.email) {
                return Err(RegistryError::DuplicateEmail(actor.email));
            }
            let id = VendorId::new(dir.allocate_id());
            dir.vendors.insert(id, actor);
            Ok(id)
        })
    }

    fn register_customer(
        &self,
        actor: NewActor,
    ) -> BoxFuture<'_, Result<CustomerId, RegistryError>> {
        Box::pin(async move {
            actor.validate()?;
            self.failures.check("register_customer")?;

            let mut dir = self.inner.write().unwrap();
            if dir.customers.values().any(|c| c.email == actor.email) {
                return Err(RegistryError::DuplicateEmail(actor.email));
            }
            let id = CustomerId::new(dir.allocate_id());
            dir.customers.insert(id, actor);
            Ok(id)
        })
    }
}

// ============================================================================
// Config
// ============================================================================

/// In-memory configuration store.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    config: RwLock<Option<Config>>,
    /// Failure injection for reads and writes
    pub failures: FailureSwitch,
}

impl InMemoryConfigStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `config`.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let store = Self::new();
        *store.config.write().unwrap() = Some(config);
        store
    }

    /// The stored config, bypassing failure injection.
    #[must_use]
    pub fn get(&self) -> Option<Config> {
        *self.config.read().unwrap()
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn current_config(&self) -> BoxFuture<'_, Result<Option<Config>, StorageError>> {
        Box::pin(async move {
            self.failures.check("current_config")?;
            Ok(*self.config.read().unwrap())
        })
    }

    fn save_config(&self, config: Config) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.failures.check("save_config")?;
            *self.config.write().unwrap() = Some(config);
            Ok(())
        })
    }
}

// ============================================================================
// Pool
// ============================================================================

/// In-memory pool repository.
#[derive(Debug, Default)]
pub struct InMemoryPoolRepository {
    pool: RwLock<Option<TicketPool>>,
    saves: AtomicI64,
    /// Failure injection for writes
    pub save_failures: FailureSwitch,
    /// Failure injection for reads
    pub load_failures: FailureSwitch,
}

impl InMemoryPoolRepository {
    /// Create an empty repository (no pool record).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository already holding `pool`.
    #[must_use]
    pub fn with_pool(pool: TicketPool) -> Self {
        let repo = Self::new();
        *repo.pool.write().unwrap() = Some(pool);
        repo
    }

    /// The stored pool, bypassing failure injection.
    #[must_use]
    pub fn stored(&self) -> Option<TicketPool> {
        *self.pool.read().unwrap()
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> i64 {
        self.saves.load(Ordering::SeqCst)
    }
}

impl PoolRepository for InMemoryPoolRepository {
    fn load_pool(&self) -> BoxFuture<'_, Result<Option<TicketPool>, StorageError>> {
        Box::pin(async move {
            self.load_failures.check("load_pool")?;
            Ok(*self.pool.read().unwrap())
        })
    }

    fn save_pool(&self, pool: TicketPool) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.save_failures.check("save_pool")?;
            self.store(pool);
            Ok(())
        })
    }
}

impl InMemoryPoolRepository {
    fn store(&self, pool: TicketPool) {
        *self.pool.write().unwrap() = Some(pool);
        self.saves.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Transaction log
// ============================================================================

/// In-memory append-only transaction log.
#[derive(Debug, Default)]
pub struct InMemoryTransactionLog {
    entries: RwLock<Vec<TransactionEntry>>,
    /// Failure injection for appends
    pub failures: FailureSwitch,
}

impl InMemoryTransactionLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries in append order.
    #[must_use]
    pub fn entries(&self) -> Vec<TransactionEntry> {
        self.entries.read().unwrap().clone()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

// ============================================================================
// Ledger
// ============================================================================

/// Commits into an [`InMemoryPoolRepository`] and an
/// [`InMemoryTransactionLog`] as one unit.
///
/// The pool's `save_failures` and the log's `failures` are both checked
/// before anything is written, so a commit applies both writes or neither.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    pools: Arc<InMemoryPoolRepository>,
    log: Arc<InMemoryTransactionLog>,
}

impl InMemoryLedger {
    /// Join a repository and a log.
    #[must_use]
    pub const fn new(pools: Arc<InMemoryPoolRepository>, log: Arc<InMemoryTransactionLog>) -> Self {
        Self { pools, log }
    }
}

impl PoolLedger for InMemoryLedger {
    fn commit(
        &self,
        pool: TicketPool,
        entry: TransactionEntry,
    ) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.pools.save_failures.check("commit_pool")?;
            self.log.failures.check("commit_log")?;

            self.pools.store(pool);
            self.log.entries.write().unwrap().push(entry);
            Ok(())
        })
    }
}
