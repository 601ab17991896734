//! Postgres-backed employee repository.
//!
//! Each record is stored as a JSONB document next to the columns that carry
//! constraints (`email`, unique on `lower(email)`) or ordering (`created_at`).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use tracing::instrument;

use workforce_core::{DomainError, EmployeeId};
use workforce_employees::{
    Employee, EmployeeRepository, EmployeeUpdate, NewEmployee, RepositoryError, matches_query,
};

#[derive(Debug, Clone)]
pub struct PostgresEmployeeStore {
    pool: Arc<PgPool>,
}

impl PostgresEmployeeStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS employees (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL,
                record JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS employees_email_lower_idx ON employees (lower(email))",
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Employee>, RepositoryError> {
        let rows = sqlx::query("SELECT record FROM employees ORDER BY created_at DESC, id DESC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(decode_record).collect()
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeStore {
    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<Employee>, RepositoryError> {
        self.load_all().await
    }

    #[instrument(skip(self), err)]
    async fn search(&self, query: &str) -> Result<Vec<Employee>, RepositoryError> {
        // Filtering happens in process so search semantics match the in-memory store.
        let all = self.load_all().await?;
        Ok(all.into_iter().filter(|e| matches_query(e, query)).collect())
    }

    #[instrument(skip(self), fields(employee_id = %id), err)]
    async fn get(&self, id: EmployeeId) -> Result<Employee, RepositoryError> {
        let row = sqlx::query("SELECT record FROM employees WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?
            .ok_or_else(DomainError::not_found)?;

        decode_record(&row)
    }

    #[instrument(skip(self, new), err)]
    async fn create(&self, new: NewEmployee) -> Result<Employee, RepositoryError> {
        let employee = Employee::create(EmployeeId::new(), new, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO employees (id, email, record, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(employee.id.as_uuid())
        .bind(&employee.email)
        .bind(encode_record(&employee)?)
        .bind(employee.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        Ok(employee)
    }

    #[instrument(skip(self, update), fields(employee_id = %id), err)]
    async fn update(
        &self,
        id: EmployeeId,
        update: EmployeeUpdate,
    ) -> Result<Employee, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("update", e))?;

        let row = sqlx::query("SELECT record FROM employees WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update", e))?
            .ok_or_else(DomainError::not_found)?;

        let mut employee = decode_record(&row)?;
        employee.apply(update, Utc::now());

        sqlx::query("UPDATE employees SET email = $2, record = $3 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(&employee.email)
            .bind(encode_record(&employee)?)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("update", e))?;

        Ok(employee)
    }

    #[instrument(skip(self), fields(employee_id = %id), err)]
    async fn delete(&self, id: EmployeeId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }
}

fn encode_record(employee: &Employee) -> Result<serde_json::Value, RepositoryError> {
    serde_json::to_value(employee)
        .map_err(|e| RepositoryError::Unavailable(format!("failed to encode employee: {e}")))
}

fn decode_record(row: &sqlx::postgres::PgRow) -> Result<Employee, RepositoryError> {
    let value: serde_json::Value = row
        .try_get("record")
        .map_err(|e| RepositoryError::Unavailable(format!("failed to read employee row: {e}")))?;
    serde_json::from_value(value)
        .map_err(|e| RepositoryError::Unavailable(format!("corrupt employee record: {e}")))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                DomainError::conflict("employee email already exists").into()
            } else {
                RepositoryError::Unavailable(format!(
                    "database error in {operation}: {}",
                    db_err.message()
                ))
            }
        }
        other => RepositoryError::Unavailable(format!("sqlx error in {operation}: {other}")),
    }
}
