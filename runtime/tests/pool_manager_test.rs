//! `PoolManager` integration tests against in-memory collaborators.
//!
//! Run with: `cargo test -p ticket-pool-runtime --test pool_manager_test`

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use ticket_pool_core::{
    Actor, Clock, ConfigCandidate, CustomerId, PoolError, PoolStatus, TicketPool, TransactionKind,
    VendorId,
};
use ticket_pool_testing::{init_test_tracing, test_clock, PoolHarness};

const VENDOR: VendorId = VendorId::new(1);
const CUSTOMER: CustomerId = CustomerId::new(2);

fn harness() -> PoolHarness {
    init_test_tracing();
    PoolHarness::new()
        .with_config(100, 20, 5, 2)
        .with_vendor(VENDOR)
        .with_customer(CUSTOMER)
        .build()
}

const fn candidate(total: i64, max: i64, release: i64, retrieval: i64) -> ConfigCandidate {
    ConfigCandidate {
        total_tickets: total,
        max_ticket_capacity: max,
        ticket_release_rate: release,
        customer_retrieval_rate: retrieval,
    }
}

/// Scenario: add 15, add 10 (rejected), purchase 5, purchase 20 (rejected).
#[tokio::test]
async fn test_add_purchase_scenario() {
    let h = harness();

    let pool = h.manager.add_tickets(VENDOR, 15).await.unwrap();
    assert_eq!(pool.status(), (15, 15));

    let rejected = h.manager.add_tickets(VENDOR, 10).await;
    assert!(matches!(
        rejected,
        Err(PoolError::CapacityExceeded {
            requested: 10,
            available: 15,
            max_capacity: 20,
            ..
        })
    ));
    assert_eq!(h.pools.stored().map(|p| p.status()), Some((15, 15)));

    let pool = h.manager.purchase_tickets(CUSTOMER, 5).await.unwrap();
    assert_eq!(pool.status(), (10, 15));

    let rejected = h.manager.purchase_tickets(CUSTOMER, 20).await;
    assert!(matches!(
        rejected,
        Err(PoolError::InsufficientStock {
            requested: 20,
            available: 10
        })
    ));

    let status = h.manager.status().await.unwrap();
    assert_eq!(
        status,
        PoolStatus {
            available_tickets: 10,
            released_tickets: 15,
            total_tickets: 100,
            max_ticket_capacity: 20,
        }
    );

    // Exactly one entry per successful step, none for the rejections.
    let entries = h.log.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind(), TransactionKind::Add);
    assert_eq!(entries[0].vendor_id(), Some(VENDOR));
    assert_eq!(entries[0].tickets_added(), 15);
    assert_eq!(entries[0].tickets_purchased(), 0);
    assert_eq!(entries[1].kind(), TransactionKind::Purchase);
    assert_eq!(entries[1].customer_id(), Some(CUSTOMER));
    assert_eq!(entries[1].tickets_purchased(), 5);
    assert_eq!(entries[1].timestamp(), test_clock().now());
}

#[tokio::test]
async fn test_released_total_is_monotonic() {
    let h = harness();

    h.manager.add_tickets(VENDOR, 8).await.unwrap();
    let pool = h.manager.purchase_tickets(CUSTOMER, 8).await.unwrap();

    assert_eq!(pool.available_tickets(), 0);
    assert_eq!(pool.released_tickets(), 8);
}

#[tokio::test]
async fn test_lifetime_total_caps_adds() {
    init_test_tracing();
    let h = PoolHarness::new()
        .with_config(30, 20, 5, 2)
        .with_vendor(VENDOR)
        .with_customer(CUSTOMER)
        .build();

    h.manager.add_tickets(VENDOR, 20).await.unwrap();
    h.manager.purchase_tickets(CUSTOMER, 20).await.unwrap();
    h.manager.add_tickets(VENDOR, 10).await.unwrap();

    // Pool has room for 10 more, but only 30 may ever be released.
    let result = h.manager.add_tickets(VENDOR, 1).await;
    assert!(matches!(
        result,
        Err(PoolError::CapacityExceeded {
            released: 30,
            total_tickets: 30,
            ..
        })
    ));
}

#[tokio::test]
async fn test_unknown_vendor_is_rejected_before_anything_else() {
    init_test_tracing();
    // No config either: the actor check comes first.
    let h = PoolHarness::new().build();

    let result = h.manager.add_tickets(VendorId::new(99), 5).await;
    assert!(matches!(
        result,
        Err(PoolError::UnknownActor(Actor::Vendor(id))) if id == VendorId::new(99)
    ));
    assert!(h.log.is_empty());
    assert!(h.pools.stored().is_none());
}

#[tokio::test]
async fn test_unknown_customer_is_rejected() {
    let h = harness();

    // A vendor id is not a customer id.
    let result = h.manager.purchase_tickets(CustomerId::new(VENDOR.get()), 1).await;
    assert!(matches!(
        result,
        Err(PoolError::UnknownActor(Actor::Customer(_)))
    ));
}

#[tokio::test]
async fn test_missing_config() {
    init_test_tracing();
    let h = PoolHarness::new()
        .with_vendor(VENDOR)
        .with_customer(CUSTOMER)
        .build();

    assert!(matches!(
        h.manager.add_tickets(VENDOR, 1).await,
        Err(PoolError::ConfigMissing)
    ));
    assert!(matches!(
        h.manager.purchase_tickets(CUSTOMER, 1).await,
        Err(PoolError::ConfigMissing)
    ));
    assert!(matches!(h.manager.status().await, Err(PoolError::ConfigMissing)));
    assert!(matches!(
        h.manager.current_config().await,
        Err(PoolError::ConfigMissing)
    ));
    assert!(h.log.is_empty());
}

#[tokio::test]
async fn test_non_positive_quantity_is_rejected() {
    let h = harness();

    assert!(matches!(
        h.manager.add_tickets(VENDOR, 0).await,
        Err(PoolError::InvalidQuantity { quantity: 0 })
    ));
    assert!(matches!(
        h.manager.purchase_tickets(CUSTOMER, -2).await,
        Err(PoolError::InvalidQuantity { quantity: -2 })
    ));
    assert!(h.log.is_empty());
}

#[tokio::test]
async fn test_status_before_pool_exists() {
    let h = harness();

    assert!(matches!(
        h.manager.status().await,
        Err(PoolError::PoolUninitialized)
    ));

    // initialize() creates and persists an empty pool.
    let pool = h.manager.initialize().await.unwrap();
    assert_eq!(pool, TicketPool::new());
    assert_eq!(h.pools.stored(), Some(TicketPool::new()));
    assert_eq!(h.manager.status().await.unwrap().available_tickets, 0);
}

#[tokio::test]
async fn test_existing_pool_is_loaded_not_recreated() {
    init_test_tracing();
    let existing = TicketPool::from_counts(7, 12).unwrap();
    let h = PoolHarness::new()
        .with_config(100, 20, 5, 2)
        .with_pool(existing)
        .with_customer(CUSTOMER)
        .build();

    assert_eq!(h.manager.initialize().await.unwrap(), existing);
    assert_eq!(h.pools.save_count(), 0);

    let pool = h.manager.purchase_tickets(CUSTOMER, 7).await.unwrap();
    assert_eq!(pool.status(), (0, 12));
}

#[tokio::test]
async fn test_pool_save_failure_leaves_state_untouched() {
    let h = harness();
    h.manager.add_tickets(VENDOR, 5).await.unwrap();

    h.pools.save_failures.fail_always();
    let result = h.manager.add_tickets(VENDOR, 5).await;
    assert!(matches!(result, Err(PoolError::Storage(_))));

    h.pools.save_failures.heal();
    assert_eq!(h.manager.status().await.unwrap().available_tickets, 5);
    assert_eq!(h.pools.stored().map(|p| p.status()), Some((5, 5)));
    assert_eq!(h.log.len(), 1);
}

#[tokio::test]
async fn test_log_failure_leaves_pool_untouched() {
    let h = harness();
    h.manager.add_tickets(VENDOR, 5).await.unwrap();

    h.log.failures.fail_always();
    let result = h.manager.add_tickets(VENDOR, 5).await;
    assert!(matches!(result, Err(PoolError::Storage(_))));

    // Neither memory nor storage moved.
    assert_eq!(h.pools.stored().map(|p| p.status()), Some((5, 5)));
    assert_eq!(h.manager.status().await.unwrap().available_tickets, 5);
    assert_eq!(h.log.len(), 1);

    h.log.failures.heal();
    let pool = h.manager.purchase_tickets(CUSTOMER, 5).await.unwrap();
    assert_eq!(pool.status(), (0, 5));
}

#[tokio::test]
async fn test_failed_commit_never_surfaces_unlogged_tickets() {
    let h = harness();
    h.manager.initialize().await.unwrap();

    // The pool write would be allowed, the log write is not.
    h.pools.save_failures.fail_after(1);
    h.log.failures.fail_always();

    let result = h.manager.add_tickets(VENDOR, 4).await;
    assert!(matches!(result, Err(PoolError::Storage(_))));

    h.pools.save_failures.heal();
    h.log.failures.heal();
    assert_eq!(h.pools.stored(), Some(TicketPool::new()));
    assert!(h.log.is_empty());

    let status = h.manager.status().await.unwrap();
    assert_eq!((status.available_tickets, status.released_tickets), (0, 0));

    // The failed add cannot be bought.
    assert!(matches!(
        h.manager.purchase_tickets(CUSTOMER, 4).await,
        Err(PoolError::InsufficientStock { requested: 4, available: 0 })
    ));
    assert!(h.log.is_empty());
}

#[tokio::test]
async fn test_failed_purchase_commit_keeps_stock() {
    let h = harness();
    h.manager.add_tickets(VENDOR, 6).await.unwrap();

    h.log.failures.fail_always();
    assert!(matches!(
        h.manager.purchase_tickets(CUSTOMER, 6).await,
        Err(PoolError::Storage(_))
    ));
    h.log.failures.heal();

    assert_eq!(h.pools.stored().map(|p| p.status()), Some((6, 6)));
    assert_eq!(h.log.len(), 1);
    let pool = h.manager.purchase_tickets(CUSTOMER, 6).await.unwrap();
    assert_eq!(pool.status(), (0, 6));
}

#[tokio::test]
async fn test_identity_lookup_failure_is_operational() {
    let h = harness();
    h.directory.failures.fail_always();

    let result = h.manager.add_tickets(VENDOR, 1).await;
    assert!(matches!(&result, Err(e) if e.is_operational()));
}

#[tokio::test]
async fn test_initialize_config() {
    init_test_tracing();
    let h = PoolHarness::new().build();

    let config = h
        .manager
        .initialize_config(candidate(100, 20, 5, 2))
        .await
        .unwrap();
    assert_eq!(h.configs.get(), Some(config));

    // Identical values are accepted again.
    assert!(h.manager.initialize_config(candidate(100, 20, 5, 2)).await.is_ok());

    // Different values are not.
    assert!(matches!(
        h.manager.initialize_config(candidate(200, 20, 5, 2)).await,
        Err(PoolError::ConfigAlreadyInitialized)
    ));
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let h = harness();
    let before = h.configs.get();

    let result = h.manager.reset_config(candidate(10, 20, 5, 2)).await;
    assert!(matches!(result, Err(PoolError::InvalidConfig(_))));
    assert_eq!(h.configs.get(), before);
}

#[tokio::test]
async fn test_reset_config_keeps_counters() {
    let h = harness();
    h.manager.add_tickets(VENDOR, 15).await.unwrap();

    let config = h.manager.reset_config(candidate(200, 40, 10, 4)).await.unwrap();
    assert_eq!(config.max_ticket_capacity(), 40);

    let status = h.manager.status().await.unwrap();
    assert_eq!(status.available_tickets, 15);
    assert_eq!(status.released_tickets, 15);
    assert_eq!(status.total_tickets, 200);

    // New capacity applies immediately.
    h.manager.add_tickets(VENDOR, 25).await.unwrap();
}

#[tokio::test]
async fn test_reset_config_conflicting_with_pool() {
    let h = harness();
    h.manager.add_tickets(VENDOR, 15).await.unwrap();

    let result = h.manager.reset_config(candidate(100, 10, 5, 2)).await;
    assert!(matches!(
        result,
        Err(PoolError::ConfigConflict {
            available: 15,
            released: 15
        })
    ));
    assert_eq!(
        h.manager.current_config().await.unwrap().max_ticket_capacity(),
        20
    );
}
