//! Postgres-backed credential store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | Any other | `Unavailable` |
//! | Everything else | N/A | `Unavailable` |
//!
//! Email uniqueness is enforced by a unique index on `lower(email)`, so two
//! concurrent `create` calls for one address cannot both commit.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;

use workforce_auth::{CredentialStore, Email, Identity, NewIdentity, Role, StoreError};
use workforce_core::UserId;

#[derive(Debug, Clone)]
pub struct PostgresCredentialStore {
    pool: Arc<PgPool>,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the `users` table and its email index if they do not exist.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL CHECK (role IN ('user', 'admin')),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS users_email_lower_idx ON users (lower(email))")
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    #[instrument(skip(self, email), err)]
    async fn find_by_email(&self, email: &Email) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE lower(email) = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_email", e))?;

        row.map(|r| UserRow::from_pg(&r)?.into_identity()).transpose()
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn find_by_id(&self, id: UserId) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.map(|r| UserRow::from_pg(&r)?.into_identity()).transpose()
    }

    #[instrument(skip(self, new), fields(role = %new.role), err)]
    async fn create(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        let id = UserId::new();
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, role, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(&new.name)
        .bind(new.email.as_str())
        .bind(&new.password_hash)
        .bind(new.role.as_str())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        UserRow::from_pg(&row)?.into_identity()
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                StoreError::Conflict
            } else {
                StoreError::unavailable(format!(
                    "database error in {operation}: {}",
                    db_err.message()
                ))
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::unavailable(format!("connection pool closed in {operation}"))
        }
        other => StoreError::unavailable(format!("sqlx error in {operation}: {other}")),
    }
}

struct UserRow {
    id: uuid::Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn from_pg(row: &sqlx::postgres::PgRow) -> Result<Self, StoreError> {
        let read = |e: sqlx::Error| StoreError::unavailable(format!("failed to read users row: {e}"));
        Ok(Self {
            id: row.try_get("id").map_err(read)?,
            name: row.try_get("name").map_err(read)?,
            email: row.try_get("email").map_err(read)?,
            password_hash: row.try_get("password_hash").map_err(read)?,
            role: row.try_get("role").map_err(read)?,
            created_at: row.try_get("created_at").map_err(read)?,
        })
    }

    fn into_identity(self) -> Result<Identity, StoreError> {
        let email = Email::parse(&self.email)
            .map_err(|e| StoreError::unavailable(format!("corrupt email in users row: {e}")))?;
        let role = self
            .role
            .parse::<Role>()
            .map_err(|e| StoreError::unavailable(format!("corrupt users row: {e}")))?;

        Ok(Identity {
            id: UserId::from_uuid(self.id),
            name: self.name,
            email,
            password_hash: self.password_hash,
            role,
            created_at: self.created_at,
        })
    }
}
