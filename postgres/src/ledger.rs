//! Config row, pool row and transaction log.
//!
//! A committed transition writes the pool row and its log row inside one
//! database transaction, so a failure at any point leaves neither behind.

use crate::{PostgresStore, db_error};
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use sqlx::PgExecutor;
use ticket_pool_core::config::CONFIG_KEY;
use ticket_pool_core::pool::POOL_KEY;
use ticket_pool_core::{
    Config, ConfigCandidate, ConfigStore, CustomerId, PoolLedger, PoolRepository, StorageError,
    TicketPool, TransactionEntry, VendorId,
};

type LogRow = (Option<i64>, Option<i64>, i64, i64, DateTime<Utc>);

impl ConfigStore for PostgresStore {
    fn current_config(&self) -> BoxFuture<'_, Result<Option<Config>, StorageError>> {
        Box::pin(async move {
            let row: Option<(i64, i64, i64, i64)> = sqlx::query_as(
                r"
                SELECT total_tickets, max_ticket_capacity, ticket_release_rate, customer_retrieval_rate
                FROM ticket_config
                WHERE id = $1
                ",
            )
            .bind(CONFIG_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("current_config"))?;

            let Some((total, max, release, retrieval)) = row else {
                return Ok(None);
            };

            let candidate = ConfigCandidate {
                total_tickets: total,
                max_ticket_capacity: max,
                ticket_release_rate: release,
                customer_retrieval_rate: retrieval,
            };
            candidate
                .validate()
                .map(Some)
                .map_err(|e| StorageError::Corrupt(format!("ticket_config: {e}")))
        })
    }

    fn save_config(&self, config: Config) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            sqlx::query(
                r"
                INSERT INTO ticket_config (
                    id, total_tickets, max_ticket_capacity, ticket_release_rate,
                    customer_retrieval_rate, updated_at
                ) VALUES ($1, $2, $3, $4, $5, now())
                ON CONFLICT (id) DO UPDATE
                SET total_tickets = EXCLUDED.total_tickets,
                    max_ticket_capacity = EXCLUDED.max_ticket_capacity,
                    ticket_release_rate = EXCLUDED.ticket_release_rate,
                    customer_retrieval_rate = EXCLUDED.customer_retrieval_rate,
                    updated_at = now()
                ",
            )
            .bind(CONFIG_KEY)
            .bind(config.total_tickets())
            .bind(config.max_ticket_capacity())
            .bind(config.ticket_release_rate())
            .bind(config.customer_retrieval_rate())
            .execute(&self.pool)
            .await
            .map_err(db_error("save_config"))?;

            tracing::debug!(?config, "Configuration saved");
            Ok(())
        })
    }
}

impl PoolRepository for PostgresStore {
    fn load_pool(&self) -> BoxFuture<'_, Result<Option<TicketPool>, StorageError>> {
        Box::pin(async move {
            let row: Option<(i64, i64)> = sqlx::query_as(
                "SELECT available_tickets, released_tickets FROM ticket_pool WHERE id = $1",
            )
            .bind(POOL_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("load_pool"))?;

            row.map(|(available, released)| {
                TicketPool::from_counts(available, released).ok_or_else(|| {
                    StorageError::Corrupt(format!(
                        "ticket_pool: available {available}, released {released}"
                    ))
                })
            })
            .transpose()
        })
    }

    fn save_pool(&self, pool: TicketPool) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            upsert_pool(&self.pool, pool)
                .await
                .map_err(db_error("save_pool"))
        })
    }
}

impl PoolLedger for PostgresStore {
    fn commit(
        &self,
        pool: TicketPool,
        entry: TransactionEntry,
    ) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let mut tx = self.pool.begin().await.map_err(db_error("begin_commit"))?;

            upsert_pool(&mut *tx, pool)
                .await
                .map_err(db_error("commit_pool"))?;
            insert_entry(&mut *tx, &entry)
                .await
                .map_err(db_error("commit_log"))?;

            // Dropping an uncommitted transaction rolls it back.
            tx.commit().await.map_err(db_error("commit"))?;
            Ok(())
        })
    }
}

async fn upsert_pool<'e>(
    executor: impl PgExecutor<'e>,
    pool: TicketPool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO ticket_pool (id, available_tickets, released_tickets, updated_at)
        VALUES ($1, $2, $3, now())
        ON CONFLICT (id) DO UPDATE
        SET available_tickets = EXCLUDED.available_tickets,
            released_tickets = EXCLUDED.released_tickets,
            updated_at = now()
        ",
    )
    .bind(POOL_KEY)
    .bind(pool.available_tickets())
    .bind(pool.released_tickets())
    .execute(executor)
    .await?;
    Ok(())
}

async fn insert_entry<'e>(
    executor: impl PgExecutor<'e>,
    entry: &TransactionEntry,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO ticket_log (
            vendor_id, customer_id, tickets_added, tickets_purchased, logged_at
        ) VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(entry.vendor_id().map(VendorId::get))
    .bind(entry.customer_id().map(CustomerId::get))
    .bind(entry.tickets_added())
    .bind(entry.tickets_purchased())
    .bind(entry.timestamp())
    .execute(executor)
    .await?;
    Ok(())
}

impl PostgresStore {
    /// The most recent `limit` log entries, oldest first.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Database`] if the query fails
    /// - [`StorageError::Corrupt`] if a row names neither or both actors
    pub async fn recent_transactions(
        &self,
        limit: i64,
    ) -> Result<Vec<TransactionEntry>, StorageError> {
        let rows: Vec<LogRow> = sqlx::query_as(
            r"
            SELECT vendor_id, customer_id, tickets_added, tickets_purchased, logged_at
            FROM (
                SELECT * FROM ticket_log ORDER BY transaction_id DESC LIMIT $1
            ) recent
            ORDER BY transaction_id ASC
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("recent_transactions"))?;

        rows.into_iter().map(entry_from_row).collect()
    }
}

fn entry_from_row(
    (vendor_id, customer_id, added, purchased, logged_at): LogRow,
) -> Result<TransactionEntry, StorageError> {
    match (vendor_id, customer_id) {
        (Some(vendor), None) => Ok(TransactionEntry::added(VendorId::new(vendor), added, logged_at)),
        (None, Some(customer)) => Ok(TransactionEntry::purchased(
            CustomerId::new(customer),
            purchased,
            logged_at,
        )),
        _ => Err(StorageError::Corrupt(format!(
            "ticket_log: vendor {vendor_id:?}, customer {customer_id:?}"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code uses unwrap
mod tests {
    use super::*;
    use ticket_pool_core::TransactionKind;

    #[test]
    fn test_entry_from_vendor_row() {
        let now = Utc::now();
        let entry = entry_from_row((Some(3), None, 15, 0, now)).unwrap();
        assert_eq!(entry.kind(), TransactionKind::Add);
        assert_eq!(entry.vendor_id(), Some(VendorId::new(3)));
        assert_eq!(entry.tickets_added(), 15);
    }

    #[test]
    fn test_entry_from_customer_row() {
        let now = Utc::now();
        let entry = entry_from_row((None, Some(4), 0, 5, now)).unwrap();
        assert_eq!(entry.kind(), TransactionKind::Purchase);
        assert_eq!(entry.customer_id(), Some(CustomerId::new(4)));
        assert_eq!(entry.tickets_purchased(), 5);
    }

    #[test]
    fn test_entry_row_without_actor_is_corrupt() {
        let result = entry_from_row((None, None, 1, 0, Utc::now()));
        assert!(matches!(result, Err(StorageError::Corrupt(_))));
    }
}
