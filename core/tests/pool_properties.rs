//! Property tests for the pool transitions.
//!
//! Run with: `cargo test -p ticket-pool-core --test pool_properties`

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use proptest::prelude::*;
use ticket_pool_core::{Config, ConfigCandidate, PoolError, TicketPool};

#[derive(Debug, Clone, Copy)]
enum Op {
    Add(i64),
    Purchase(i64),
}

/// Valid configs: 1 <= release <= max <= total.
fn config_strategy() -> impl Strategy<Value = Config> {
    (1_i64..=500)
        .prop_flat_map(|total| (Just(total), 1..=total))
        .prop_flat_map(|(total, max)| (Just(total), Just(max), 1..=max, 1_i64..=50))
        .prop_map(|(total, max, release, retrieval)| {
            ConfigCandidate {
                total_tickets: total,
                max_ticket_capacity: max,
                ticket_release_rate: release,
                customer_retrieval_rate: retrieval,
            }
            .validate()
            .expect("strategy only builds valid configs")
        })
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-5_i64..=80).prop_map(Op::Add),
        (-5_i64..=80).prop_map(Op::Purchase),
    ]
}

fn apply(pool: &TicketPool, op: Op, config: &Config) -> Result<TicketPool, PoolError> {
    match op {
        Op::Add(n) => pool.add(n, config),
        Op::Purchase(n) => pool.purchase(n),
    }
}

proptest! {
    #[test]
    fn invariants_hold_after_every_operation(
        config in config_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let mut pool = TicketPool::new();

        for op in ops {
            let before = pool;
            match apply(&pool, op, &config) {
                Ok(next) => {
                    prop_assert!(next.released_tickets() >= before.released_tickets());
                    pool = next;
                }
                Err(_) => {
                    // Receiver is never mutated; the caller keeps `before`.
                    prop_assert_eq!(pool, before);
                }
            }

            prop_assert!(pool.available_tickets() >= 0);
            prop_assert!(pool.available_tickets() <= config.max_ticket_capacity());
            prop_assert!(pool.released_tickets() <= config.total_tickets());
            prop_assert!(pool.available_tickets() <= pool.released_tickets());
        }
    }

    #[test]
    fn add_then_purchase_restores_available(
        config in config_strategy(),
        seed in 0_i64..=500,
        n in 1_i64..=500,
    ) {
        let start = TicketPool::new()
            .add(seed.min(config.max_ticket_capacity()).max(1), &config)
            .expect("seed fits in an empty pool");

        if let Ok(added) = start.add(n, &config) {
            let restored = added.purchase(n).expect("just-added tickets are purchasable");
            prop_assert_eq!(restored.available_tickets(), start.available_tickets());
            prop_assert_eq!(restored.released_tickets(), start.released_tickets() + n);
        }
    }

    #[test]
    fn oversized_purchase_is_rejected(
        config in config_strategy(),
        extra in 1_i64..=100,
    ) {
        let pool = TicketPool::new().add(1, &config).expect("one ticket always fits");
        let requested = pool.available_tickets() + extra;
        let is_insufficient = matches!(
            pool.purchase(requested),
            Err(PoolError::InsufficientStock { .. })
        );
        prop_assert!(is_insufficient);
    }

    #[test]
    fn over_capacity_add_is_rejected_even_with_total_headroom(
        max in 1_i64..=100,
        headroom in 1_i64..=100,
    ) {
        let config = ConfigCandidate {
            total_tickets: max * 3 + headroom,
            max_ticket_capacity: max,
            ticket_release_rate: 1,
            customer_retrieval_rate: 1,
        }
        .validate()
        .expect("valid config");

        let full = TicketPool::new().add(max, &config).expect("fill to capacity");
        prop_assert!(full.released_tickets() + 1 <= config.total_tickets());
        let is_capacity = matches!(
            full.add(1, &config),
            Err(PoolError::CapacityExceeded { .. })
        );
        prop_assert!(is_capacity);
    }
}
