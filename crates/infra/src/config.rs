//! Process configuration loaded from environment variables.
//!
//! | variable | default | notes |
//! |---|---|---|
//! | `BIND_ADDR` | `0.0.0.0:8080` | |
//! | `JWT_SECRET` | (required) | at least [`MIN_SECRET_LEN`] bytes |
//! | `TOKEN_TTL_HOURS` | `24` | 1 to [`MAX_TOKEN_TTL_HOURS`] |
//! | `USE_PERSISTENT_STORES` | `false` | `true` selects Postgres |
//! | `DATABASE_URL` | | required when persistent stores are on |
//! | `BOOTSTRAP_ADMIN_EMAIL` | | seeds one admin at startup |
//! | `BOOTSTRAP_ADMIN_PASSWORD` | | required with the email |
//! | `BOOTSTRAP_ADMIN_NAME` | `Administrator` | |

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

pub const MIN_SECRET_LEN: usize = 32;
/// One year.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_ADMIN_NAME: &str = "Administrator";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Credentials for the administrator seeded at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    /// `Some` only when persistent stores are enabled.
    pub database_url: Option<String>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("persistent", &self.database_url.is_some())
            .field("bootstrap_admin", &self.bootstrap_admin)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("BIND_ADDR", e.to_string()))?;

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::invalid(
                "JWT_SECRET",
                format!("must be at least {MIN_SECRET_LEN} bytes"),
            ));
        }

        let token_ttl = match get("TOKEN_TTL_HOURS") {
            None => Duration::hours(24),
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|hours| (1..=MAX_TOKEN_TTL_HOURS).contains(hours))
                .and_then(Duration::try_hours)
                .ok_or_else(|| {
                    ConfigError::invalid(
                        "TOKEN_TTL_HOURS",
                        format!("must be an integer from 1 to {MAX_TOKEN_TTL_HOURS}"),
                    )
                })?,
        };

        let persistent = match get("USE_PERSISTENT_STORES") {
            None => false,
            Some(raw) => raw
                .parse::<bool>()
                .map_err(|_| ConfigError::invalid("USE_PERSISTENT_STORES", "expected true or false"))?,
        };
        let database_url = if persistent {
            Some(get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?)
        } else {
            None
        };

        let bootstrap_admin = match get("BOOTSTRAP_ADMIN_EMAIL") {
            None => None,
            Some(email) => Some(BootstrapAdmin {
                name: get("BOOTSTRAP_ADMIN_NAME").unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string()),
                email,
                password: get("BOOTSTRAP_ADMIN_PASSWORD")
                    .ok_or(ConfigError::Missing("BOOTSTRAP_ADMIN_PASSWORD"))?,
            }),
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            token_ttl,
            database_url,
            bootstrap_admin,
        })
    }
}
