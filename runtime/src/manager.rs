//! Serialised orchestration of pool operations.
//!
//! [`PoolManager`] owns the singleton [`TicketPool`] behind one async mutex.
//! Every add, purchase, status read and config change takes that lock, so at
//! most one of them runs at a time and operations observe the pool in lock
//! acquisition order.
//!
//! # Commit protocol
//!
//! A transition is computed on a copy of the pool. The new counters and the
//! log entry recording them go to [`PoolLedger::commit`] as one unit, and
//! the copy only replaces the in-memory pool once that commit succeeds. A
//! failed commit leaves memory and storage exactly as they were.
//!
//! [`PoolLedger::commit`]: ticket_pool_core::PoolLedger::commit

use crate::metrics;
use std::time::Instant;
use ticket_pool_core::{
    Actor, Config, ConfigCandidate, CustomerId, PoolEnvironment, PoolError, PoolStatus, TicketPool,
    TransactionEntry, VendorId,
};
use tokio::sync::Mutex;

/// The cached pool. `None` until first loaded.
type PoolSlot = Option<TicketPool>;

/// Orchestrates the shared ticket pool.
///
/// # Example
///
/// ```ignore
/// let manager = PoolManager::new(environment);
/// manager.initialize().await?;
///
/// manager.add_tickets(VendorId::new(1), 15).await?;
/// manager.purchase_tickets(CustomerId::new(1), 5).await?;
///
/// let status = manager.status().await?;
/// assert_eq!(status.available_tickets, 10);
/// ```
#[derive(Debug)]
pub struct PoolManager {
    env: PoolEnvironment,
    pool: Mutex<PoolSlot>,
}

impl PoolManager {
    /// Create a manager. The pool is loaded lazily on first use; call
    /// [`PoolManager::initialize`] to load or create it up front.
    #[must_use]
    pub fn new(env: PoolEnvironment) -> Self {
        Self {
            env,
            pool: Mutex::new(None),
        }
    }

    /// The injected collaborators.
    #[must_use]
    pub const fn environment(&self) -> &PoolEnvironment {
        &self.env
    }

    /// Load the stored pool, creating an empty one if none exists.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Storage`] if the pool cannot be read or created.
    #[tracing::instrument(skip(self))]
    pub async fn initialize(&self) -> Result<TicketPool, PoolError> {
        let mut slot = self.pool.lock().await;
        self.load_or_create(&mut slot).await
    }

    /// Release `quantity` tickets into the pool on behalf of a vendor.
    ///
    /// Returns the pool state after the add.
    ///
    /// # Errors
    ///
    /// - [`PoolError::UnknownActor`] if the vendor does not exist
    /// - [`PoolError::ConfigMissing`] if no config has been stored
    /// - [`PoolError::InvalidQuantity`] / [`PoolError::CapacityExceeded`]
    ///   if the transition is rejected
    /// - [`PoolError::Storage`] if any read or write fails
    #[tracing::instrument(skip(self, vendor_id), fields(vendor_id = %vendor_id))]
    pub async fn add_tickets(
        &self,
        vendor_id: VendorId,
        quantity: i64,
    ) -> Result<TicketPool, PoolError> {
        let start = Instant::now();
        let result = self.add_tickets_inner(vendor_id, quantity).await;
        Self::observe("add_tickets", start, &result);

        match &result {
            Ok(pool) => {
                metrics::record_added(quantity, pool);
                tracing::info!(
                    quantity,
                    available = pool.available_tickets(),
                    released = pool.released_tickets(),
                    "Tickets added"
                );
            }
            Err(e) => tracing::warn!(quantity, error = %e, "Failed to add tickets"),
        }
        result
    }

    /// Withdraw `quantity` tickets from the pool on behalf of a customer.
    ///
    /// Returns the pool state after the purchase.
    ///
    /// # Errors
    ///
    /// - [`PoolError::UnknownActor`] if the customer does not exist
    /// - [`PoolError::ConfigMissing`] if no config has been stored
    /// - [`PoolError::InvalidQuantity`] / [`PoolError::InsufficientStock`]
    ///   if the transition is rejected
    /// - [`PoolError::Storage`] if any read or write fails
    #[tracing::instrument(skip(self, customer_id), fields(customer_id = %customer_id))]
    pub async fn purchase_tickets(
        &self,
        customer_id: CustomerId,
        quantity: i64,
    ) -> Result<TicketPool, PoolError> {
        let start = Instant::now();
        let result = self.purchase_tickets_inner(customer_id, quantity).await;
        Self::observe("purchase_tickets", start, &result);

        match &result {
            Ok(pool) => {
                metrics::record_purchased(quantity, pool);
                tracing::info!(
                    quantity,
                    available = pool.available_tickets(),
                    released = pool.released_tickets(),
                    "Tickets purchased"
                );
            }
            Err(e) => tracing::warn!(quantity, error = %e, "Failed to purchase tickets"),
        }
        result
    }

    /// Current counters together with the configured ceilings.
    ///
    /// Never creates the pool.
    ///
    /// # Errors
    ///
    /// - [`PoolError::ConfigMissing`] if no config has been stored
    /// - [`PoolError::PoolUninitialized`] if the pool was never created
    /// - [`PoolError::Storage`] if a read fails
    #[tracing::instrument(skip(self))]
    pub async fn status(&self) -> Result<PoolStatus, PoolError> {
        let mut slot = self.pool.lock().await;
        let config = self.require_config().await?;
        let pool = self
            .load_existing(&mut slot)
            .await?
            .ok_or(PoolError::PoolUninitialized)?;
        Ok(PoolStatus::new(&pool, &config))
    }

    /// The active configuration.
    ///
    /// # Errors
    ///
    /// - [`PoolError::ConfigMissing`] if no config has been stored
    /// - [`PoolError::Storage`] if the read fails
    pub async fn current_config(&self) -> Result<Config, PoolError> {
        tracing::debug!("Fetching current configuration");
        self.require_config().await
    }

    /// Store the first configuration.
    ///
    /// Idempotent for an identical candidate: returns the stored config.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidConfig`] if the candidate fails validation
    /// - [`PoolError::ConfigAlreadyInitialized`] if a different config exists
    /// - [`PoolError::ConfigConflict`] if an existing pool exceeds the new bounds
    /// - [`PoolError::Storage`] if a read or write fails
    #[tracing::instrument(skip(self))]
    pub async fn initialize_config(&self, candidate: ConfigCandidate) -> Result<Config, PoolError> {
        let config = candidate.validate()?;

        let mut slot = self.pool.lock().await;
        match self.env.configs.current_config().await? {
            Some(existing) if existing == config => {
                tracing::debug!("Configuration already initialized with identical values");
                Ok(existing)
            }
            Some(_) => Err(PoolError::ConfigAlreadyInitialized),
            None => {
                self.check_fits(&mut slot, &config).await?;
                self.env.configs.save_config(config).await?;
                tracing::info!(?config, "Configuration initialized");
                Ok(config)
            }
        }
    }

    /// Replace the configuration wholesale.
    ///
    /// Pool counters are kept; `released_tickets` is not reset.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidConfig`] if the candidate fails validation
    /// - [`PoolError::ConfigConflict`] if the current pool exceeds the new bounds
    /// - [`PoolError::Storage`] if a read or write fails
    #[tracing::instrument(skip(self))]
    pub async fn reset_config(&self, candidate: ConfigCandidate) -> Result<Config, PoolError> {
        let config = candidate.validate()?;

        let mut slot = self.pool.lock().await;
        self.check_fits(&mut slot, &config).await?;
        self.env.configs.save_config(config).await?;
        tracing::info!(?config, "Configuration reset");
        Ok(config)
    }

    async fn add_tickets_inner(
        &self,
        vendor_id: VendorId,
        quantity: i64,
    ) -> Result<TicketPool, PoolError> {
        if !self.env.identities.vendor_exists(vendor_id).await? {
            return Err(PoolError::UnknownActor(Actor::Vendor(vendor_id)));
        }

        let mut slot = self.pool.lock().await;
        let config = self.require_config().await?;
        let current = self.load_or_create(&mut slot).await?;
        let next = current.add(quantity, &config)?;

        let entry = TransactionEntry::added(vendor_id, quantity, self.env.clock.now());
        self.commit(&mut slot, next, entry).await?;
        Ok(next)
    }

    async fn purchase_tickets_inner(
        &self,
        customer_id: CustomerId,
        quantity: i64,
    ) -> Result<TicketPool, PoolError> {
        if !self.env.identities.customer_exists(customer_id).await? {
            return Err(PoolError::UnknownActor(Actor::Customer(customer_id)));
        }

        let mut slot = self.pool.lock().await;
        self.require_config().await?;
        let current = self.load_or_create(&mut slot).await?;
        let next = current.purchase(quantity)?;

        let entry = TransactionEntry::purchased(customer_id, quantity, self.env.clock.now());
        self.commit(&mut slot, next, entry).await?;
        Ok(next)
    }

    /// Store `next` and its log entry as one unit, then publish it in memory.
    async fn commit(
        &self,
        slot: &mut PoolSlot,
        next: TicketPool,
        entry: TransactionEntry,
    ) -> Result<(), PoolError> {
        if let Err(e) = self.env.ledger.commit(next, entry).await {
            tracing::error!(error = %e, "Failed to commit pool state and log entry");
            return Err(e.into());
        }

        *slot = Some(next);
        Ok(())
    }

    async fn require_config(&self) -> Result<Config, PoolError> {
        self.env
            .configs
            .current_config()
            .await?
            .ok_or(PoolError::ConfigMissing)
    }

    async fn load_existing(&self, slot: &mut PoolSlot) -> Result<Option<TicketPool>, PoolError> {
        if let Some(pool) = *slot {
            return Ok(Some(pool));
        }

        let loaded = self.env.pools.load_pool().await?;
        if loaded.is_some() {
            tracing::info!("Existing ticket pool loaded");
        }
        *slot = loaded;
        Ok(loaded)
    }

    async fn load_or_create(&self, slot: &mut PoolSlot) -> Result<TicketPool, PoolError> {
        if let Some(pool) = self.load_existing(slot).await? {
            return Ok(pool);
        }

        let pool = TicketPool::new();
        self.env.pools.save_pool(pool).await?;
        tracing::info!("New ticket pool created");
        *slot = Some(pool);
        Ok(pool)
    }

    async fn check_fits(&self, slot: &mut PoolSlot, config: &Config) -> Result<(), PoolError> {
        match self.load_existing(slot).await? {
            Some(pool) if !pool.fits(config) => Err(PoolError::ConfigConflict {
                available: pool.available_tickets(),
                released: pool.released_tickets(),
            }),
            _ => Ok(()),
        }
    }

    fn observe<T>(operation: &'static str, start: Instant, result: &Result<T, PoolError>) {
        metrics::record_duration(operation, start.elapsed());
        if let Err(e) = result {
            metrics::record_failure(operation, e.reason(), e.is_operational());
        }
    }
}
