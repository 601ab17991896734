//! Credential store contract.
//!
//! Implementations live in `workforce-infra`; this crate only states what the
//! authentication core needs from storage.

use async_trait::async_trait;
use thiserror::Error;

use workforce_core::UserId;

use crate::{Email, Identity, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The email is already registered.
    #[error("email already registered")]
    Conflict,

    /// The backing store could not be reached or failed mid-operation.
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Everything needed to persist a new identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
}

/// Persisted user records.
///
/// # Invariants
/// - Email lookups are case-insensitive (emails are stored normalized).
/// - `create` enforces email uniqueness atomically and returns
///   [`StoreError::Conflict`] on a duplicate; callers must not rely on a prior
///   `find_by_email` to detect duplicates.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Identity>, StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<Identity>, StoreError>;

    async fn create(&self, new: NewIdentity) -> Result<Identity, StoreError>;
}
