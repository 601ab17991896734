//! Employee repository contract.

use async_trait::async_trait;
use thiserror::Error;

use workforce_core::{DomainError, EmployeeId};

use crate::{Employee, EmployeeUpdate, NewEmployee};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepositoryError {
    /// `NotFound` or `Conflict` (duplicate email).
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("employee store unavailable: {0}")]
    Unavailable(String),
}

/// Persisted employee records.
///
/// Implementations enforce email uniqueness inside `create` and `update`,
/// reporting a duplicate as `DomainError::Conflict`.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// All records, newest first.
    async fn list(&self) -> Result<Vec<Employee>, RepositoryError>;

    /// Records matching [`crate::matches_query`], newest first.
    async fn search(&self, query: &str) -> Result<Vec<Employee>, RepositoryError>;

    async fn get(&self, id: EmployeeId) -> Result<Employee, RepositoryError>;

    async fn create(&self, new: NewEmployee) -> Result<Employee, RepositoryError>;

    async fn update(&self, id: EmployeeId, update: EmployeeUpdate)
    -> Result<Employee, RepositoryError>;

    async fn delete(&self, id: EmployeeId) -> Result<(), RepositoryError>;
}
