//! Vendor and customer tables.

use crate::{PostgresStore, db_error};
use futures::future::BoxFuture;
use ticket_pool_core::{
    ActorRegistry, CustomerId, IdentityLookup, NewActor, RegistryError, StorageError, VendorId,
};

impl IdentityLookup for PostgresStore {
    fn vendor_exists(&self, id: VendorId) -> BoxFuture<'_, Result<bool, StorageError>> {
        Box::pin(async move {
            let (exists,): (bool,) =
                sqlx::query_as("SELECT EXISTS (SELECT 1 FROM vendors WHERE vendor_id = $1)")
                    .bind(id.get())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(db_error("vendor_exists"))?;
            Ok(exists)
        })
    }

    fn customer_exists(&self, id: CustomerId) -> BoxFuture<'_, Result<bool, StorageError>> {
        Box::pin(async move {
            let (exists,): (bool,) =
                sqlx::query_as("SELECT EXISTS (SELECT 1 FROM customers WHERE customer_id = $1)")
                    .bind(id.get())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(db_error("customer_exists"))?;
            Ok(exists)
        })
    }
}

impl ActorRegistry for PostgresStore {
    fn register_vendor(&self, actor: NewActor) -> BoxFuture<'_, Result<VendorId, RegistryError>> {
        Box::pin(async move {
            actor.validate()?;
            let id = self
                .insert_actor(
                    r"
                    INSERT INTO vendors (username, email, mobile_no)
                    VALUES ($1, $2, $3)
                    RETURNING vendor_id
                    ",
                    "register_vendor",
                    actor,
                )
                .await?;
            tracing::info!(vendor_id = id, "Vendor registered");
            Ok(VendorId::new(id))
        })
    }

    fn register_customer(
        &self,
        actor: NewActor,
    ) -> BoxFuture<'_, Result<CustomerId, RegistryError>> {
        Box::pin(async move {
            actor.validate()?;
            let id = self
                .insert_actor(
                    r"
                    INSERT INTO customers (username, email, mobile_no)
                    VALUES ($1, $2, $3)
                    RETURNING customer_id
                    ",
                    "register_customer",
                    actor,
                )
                .await?;
            tracing::info!(customer_id = id, "Customer registered");
            Ok(CustomerId::new(id))
        })
    }
}

impl PostgresStore {
    async fn insert_actor(
        &self,
        sql: &'static str,
        operation: &'static str,
        actor: NewActor,
    ) -> Result<i64, RegistryError> {
        let result: Result<(i64,), sqlx::Error> = sqlx::query_as(sql)
            .bind(&actor.username)
            .bind(&actor.email)
            .bind(actor.mobile_no)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok((id,)) => Ok(id),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tracing::warn!(email = %actor.email, "Duplicate registration rejected");
                Err(RegistryError::DuplicateEmail(actor.email))
            }
            Err(e) => Err(db_error(operation)(e).into()),
        }
    }
}
