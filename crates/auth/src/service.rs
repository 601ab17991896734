//! Signin, signup, and identity lookup.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use workforce_core::UserId;

use crate::{
    CredentialStore, Email, Identity, IdentitySummary, NewIdentity, Role, StoreError,
    TokenService, password,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("required fields are missing")]
    MissingFields,

    #[error("invalid email format")]
    InvalidEmail,

    #[error("password must be at least {} characters long", password::MIN_PASSWORD_LEN)]
    WeakPassword,

    /// Unknown email and wrong password are deliberately the same error.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailTaken,

    #[error("identity not found")]
    NotFound,

    #[error("credential store unavailable")]
    StoreUnavailable,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict => AuthError::EmailTaken,
            StoreError::Unavailable(msg) => {
                warn!(error = %msg, "credential store unavailable");
                AuthError::StoreUnavailable
            }
        }
    }
}

/// Validated signin input.
#[derive(Clone)]
pub struct Credentials {
    email: Email,
    password: String,
}

impl Credentials {
    /// Validate raw signin fields.
    ///
    /// An unparseable email cannot belong to anyone, so it is reported as
    /// `InvalidCredentials` rather than as a format error.
    pub fn parse(email: Option<&str>, password: Option<&str>) -> Result<Self, AuthError> {
        let (Some(email), Some(password)) = (non_blank(email), non_blank(password)) else {
            return Err(AuthError::MissingFields);
        };
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;
        Ok(Self {
            email,
            password: password.to_string(),
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated signup input. Carries no role: self-service signup always yields `user`.
#[derive(Clone)]
pub struct Registration {
    name: String,
    email: Email,
    password: String,
}

impl Registration {
    pub fn parse(
        name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, AuthError> {
        let (Some(name), Some(email), Some(password)) =
            (non_blank(name), non_blank(email), non_blank(password))
        else {
            return Err(AuthError::MissingFields);
        };
        let email = Email::parse(email).map_err(|_| AuthError::InvalidEmail)?;
        password::check_policy(password).map_err(|_| AuthError::WeakPassword)?;

        Ok(Self {
            name: name.trim().to_string(),
            email,
            password: password.to_string(),
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }
}

impl core::fmt::Debug for Registration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Successful signin/signup: the identity summary plus a fresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSuccess {
    pub user: IdentitySummary,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    pub async fn sign_in(
        &self,
        credentials: Credentials,
        now: DateTime<Utc>,
    ) -> Result<AuthSuccess, AuthError> {
        let identity = self.store.find_by_email(&credentials.email).await?;

        let Credentials { password, .. } = credentials;
        let matched = match identity {
            Some(identity) => {
                let stored = identity.password_hash.clone();
                let ok = blocking(move || password::verify(&password, &stored)).await?;
                ok.then_some(identity)
            }
            None => {
                blocking(move || password::verify_against_dummy(&password)).await?;
                None
            }
        };

        let Some(identity) = matched else {
            return Err(AuthError::InvalidCredentials);
        };

        info!(user_id = %identity.id, "sign in succeeded");
        self.issue(&identity, now)
    }

    pub async fn sign_up(
        &self,
        registration: Registration,
        now: DateTime<Utc>,
    ) -> Result<AuthSuccess, AuthError> {
        let identity = self.register(registration, Role::User).await?;
        info!(user_id = %identity.id, email = %identity.email, "sign up succeeded");
        self.issue(&identity, now)
    }

    /// Create an identity with an explicit role.
    ///
    /// Not reachable from the public signup path; used for out-of-band
    /// provisioning such as seeding the first administrator.
    pub async fn provision(
        &self,
        registration: Registration,
        role: Role,
    ) -> Result<Identity, AuthError> {
        self.register(registration, role).await
    }

    pub async fn lookup(&self, id: UserId) -> Result<IdentitySummary, AuthError> {
        self.store
            .find_by_id(id)
            .await?
            .map(|identity| identity.summary())
            .ok_or(AuthError::NotFound)
    }

    async fn register(&self, registration: Registration, role: Role) -> Result<Identity, AuthError> {
        let Registration {
            name,
            email,
            password,
        } = registration;

        let password_hash = blocking(move || password::hash(&password))
            .await?
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        // Uniqueness is decided by the store inside `create`, not by a prior lookup.
        let identity = self
            .store
            .create(NewIdentity {
                name,
                email,
                password_hash,
                role,
            })
            .await?;
        Ok(identity)
    }

    fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> Result<AuthSuccess, AuthError> {
        let issued = self
            .tokens
            .issue(identity.id, now)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(AuthSuccess {
            user: identity.summary(),
            token: issued.token,
        })
    }
}

/// Run CPU-heavy password work off the async executor.
async fn blocking<T, F>(f: F) -> Result<T, AuthError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))
}
