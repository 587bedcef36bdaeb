//! Builder wiring a `PoolManager` to in-memory collaborators.

#![allow(clippy::module_name_repetitions)]

use crate::mocks::{FixedClock, test_clock};
use crate::stores::{
    InMemoryConfigStore, InMemoryDirectory, InMemoryLedger, InMemoryPoolRepository,
    InMemoryTransactionLog,
};
use std::sync::Arc;
use ticket_pool_core::{
    ConfigCandidate, CustomerId, PoolEnvironment, TicketPool, VendorId,
};
use ticket_pool_runtime::PoolManager;

/// A `PoolManager` plus handles to every collaborator behind it.
///
/// # Example
///
/// ```
/// use ticket_pool_testing::PoolHarness;
/// use ticket_pool_core::VendorId;
///
/// let harness = PoolHarness::new()
///     .with_config(100, 50, 10, 5)
///     .with_vendor(VendorId::new(1))
///     .build();
///
/// assert!(harness.log.is_empty());
/// assert!(harness.pools.stored().is_none());
/// ```
pub struct PoolHarness {
    /// The manager under test
    pub manager: Arc<PoolManager>,
    /// Vendor/customer directory
    pub directory: Arc<InMemoryDirectory>,
    /// Config store
    pub configs: Arc<InMemoryConfigStore>,
    /// Pool repository; its `save_failures` also fail ledger commits
    pub pools: Arc<InMemoryPoolRepository>,
    /// Transaction log; its `failures` also fail ledger commits
    pub log: Arc<InMemoryTransactionLog>,
}

impl PoolHarness {
    /// Start building a harness.
    #[must_use]
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> PoolHarnessBuilder {
        PoolHarnessBuilder::default()
    }
}

/// Fluent builder for [`PoolHarness`].
#[derive(Default)]
pub struct PoolHarnessBuilder {
    config: Option<ConfigCandidate>,
    pool: Option<TicketPool>,
    vendors: Vec<VendorId>,
    customers: Vec<CustomerId>,
    clock: Option<FixedClock>,
}

impl PoolHarnessBuilder {
    /// Store a config before the manager starts.
    ///
    /// Invalid values are silently skipped by [`PoolHarnessBuilder::build`],
    /// which leaves the harness without a config.
    #[must_use]
    pub fn with_config(
        mut self,
        total_tickets: i64,
        max_ticket_capacity: i64,
        ticket_release_rate: i64,
        customer_retrieval_rate: i64,
    ) -> Self {
        self.config = Some(ConfigCandidate {
            total_tickets,
            max_ticket_capacity,
            ticket_release_rate,
            customer_retrieval_rate,
        });
        self
    }

    /// Seed the repository with an existing pool record.
    #[must_use]
    pub fn with_pool(mut self, pool: TicketPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Register a vendor.
    #[must_use]
    pub fn with_vendor(mut self, id: VendorId) -> Self {
        self.vendors.push(id);
        self
    }

    /// Register a customer.
    #[must_use]
    pub fn with_customer(mut self, id: CustomerId) -> Self {
        self.customers.push(id);
        self
    }

    /// Use a specific clock instead of [`test_clock`].
    #[must_use]
    pub fn with_clock(mut self, clock: FixedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Wire everything together.
    #[must_use]
    pub fn build(self) -> PoolHarness {
        let directory = Arc::new(InMemoryDirectory::new());
        for id in self.vendors {
            directory.insert_vendor(id);
        }
        for id in self.customers {
            directory.insert_customer(id);
        }

        let configs = Arc::new(
            match self.config.map(ConfigCandidate::validate) {
                Some(Ok(config)) => InMemoryConfigStore::with_config(config),
                _ => InMemoryConfigStore::new(),
            },
        );

        let pools = Arc::new(match self.pool {
            Some(pool) => InMemoryPoolRepository::with_pool(pool),
            None => InMemoryPoolRepository::new(),
        });

        let log = Arc::new(InMemoryTransactionLog::new());
        let clock = Arc::new(self.clock.unwrap_or_else(test_clock));

        let env = PoolEnvironment::new(
            clock,
            directory.clone(),
            configs.clone(),
            pools.clone(),
            Arc::new(InMemoryLedger::new(pools.clone(), log.clone())),
        );

        PoolHarness {
            manager: Arc::new(PoolManager::new(env)),
            directory,
            configs,
            pools,
            log,
        }
    }
}
