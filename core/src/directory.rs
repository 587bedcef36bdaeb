//! Vendor and customer registration.
//!
//! Registration sits outside the pool's locking discipline: it never touches
//! pool state, and `PoolManager` only ever asks [`IdentityLookup`] whether an
//! id exists.
//!
//! [`IdentityLookup`]: crate::environment::IdentityLookup

use crate::environment::StorageError;
use crate::ids::{CustomerId, VendorId};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Details of an actor being registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActor {
    /// Display name
    pub username: String,
    /// Contact email, unique per role
    pub email: String,
    /// Optional phone number
    #[serde(default)]
    pub mobile_no: Option<i64>,
}

impl NewActor {
    /// Check the required fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Invalid`] if the username or email is blank.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.username.trim().is_empty() {
            return Err(RegistryError::Invalid("username must not be blank".into()));
        }
        if self.email.trim().is_empty() {
            return Err(RegistryError::Invalid("email must not be blank".into()));
        }
        Ok(())
    }
}

/// Errors from actor registration.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Another actor of the same role already uses this email.
    #[error("An account with email {0} already exists.")]
    DuplicateEmail(String),

    /// A required field was missing.
    #[error("Invalid registration: {0}")]
    Invalid(String),

    /// The directory backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Registration of new vendors and customers.
pub trait ActorRegistry: Send + Sync {
    /// Register a vendor and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateEmail`] if a vendor already uses the
    /// email, or [`RegistryError::Storage`] if the write fails.
    fn register_vendor(&self, actor: NewActor) -> BoxFuture<'_, Result<VendorId, RegistryError>>;

    /// Register a customer and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateEmail`] if a customer already uses
    /// the email, or [`RegistryError::Storage`] if the write fails.
    fn register_customer(
        &self,
        actor: NewActor,
    ) -> BoxFuture<'_, Result<CustomerId, RegistryError>>;
}
