//! Store selection for the running process.

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use workforce_auth::CredentialStore;
use workforce_employees::EmployeeRepository;

use crate::config::AppConfig;
use crate::credential_store::{InMemoryCredentialStore, PostgresCredentialStore};
use crate::employee_store::{InMemoryEmployeeStore, PostgresEmployeeStore};

/// The shared stores every request handler works against.
#[derive(Clone)]
pub struct Stores {
    pub credentials: Arc<dyn CredentialStore>,
    pub employees: Arc<dyn EmployeeRepository>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            credentials: Arc::new(InMemoryCredentialStore::new()),
            employees: Arc::new(InMemoryEmployeeStore::new()),
        }
    }

    /// Connect to Postgres when `DATABASE_URL` was configured, otherwise use
    /// in-memory stores.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let Some(database_url) = config.database_url.as_deref() else {
            tracing::info!("using in-memory stores");
            return Ok(Self::in_memory());
        };

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("failed to connect to Postgres")?;

        let credentials = PostgresCredentialStore::new(pool.clone());
        credentials
            .ensure_schema()
            .await
            .context("failed to prepare users schema")?;

        let employees = PostgresEmployeeStore::new(pool);
        employees
            .ensure_schema()
            .await
            .context("failed to prepare employees schema")?;

        tracing::info!("using Postgres stores");
        Ok(Self {
            credentials: Arc::new(credentials),
            employees: Arc::new(employees),
        })
    }
}
