//! # Ticket Pool Core
//!
//! Domain types, state transitions and collaborator traits for the bounded
//! shared ticket pool.
//!
//! Vendors add tickets to a single shared pool up to a configured capacity,
//! customers purchase tickets out of it, and every accepted mutation is
//! recorded in an append-only transaction log.
//!
//! ## Core Concepts
//!
//! - **Config**: the four tunable pool parameters, validated on construction
//! - **`TicketPool`**: the `(available, released)` counter pair and its two
//!   fail-fast transitions
//! - **`TransactionEntry`**: one audit record per committed mutation
//! - **Environment**: collaborators (identity lookup, config store, pool and
//!   log persistence, clock) injected as trait objects
//!
//! This crate performs no I/O and holds no locks. Serialising access to the
//! pool is the job of `PoolManager` in `ticket-pool-runtime`.
//!
//! ## Example
//!
//! ```
//! use ticket_pool_core::{ConfigCandidate, PoolError, TicketPool};
//!
//! let config = ConfigCandidate {
//!     total_tickets: 100,
//!     max_ticket_capacity: 20,
//!     ticket_release_rate: 5,
//!     customer_retrieval_rate: 2,
//! }
//! .validate()?;
//!
//! let pool = TicketPool::new().add(15, &config)?;
//! assert_eq!(pool.available_tickets(), 15);
//!
//! let rejected = pool.add(10, &config);
//! assert!(matches!(rejected, Err(PoolError::CapacityExceeded { .. })));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod directory;
pub mod environment;
pub mod error;
pub mod ids;
pub mod pool;
pub mod transaction;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use config::{Config, ConfigCandidate, ConfigError};
pub use directory::{ActorRegistry, NewActor, RegistryError};
pub use environment::{
    Clock, ConfigStore, IdentityLookup, PoolEnvironment, PoolLedger, PoolRepository,
    StorageError, SystemClock,
};
pub use error::PoolError;
pub use ids::{Actor, CustomerId, VendorId};
pub use pool::{PoolStatus, TicketPool};
pub use transaction::{TransactionEntry, TransactionKind};
