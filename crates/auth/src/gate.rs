//! Access gate: token → principal → role check.
//!
//! Per request the gate moves through
//! `Unauthenticated → TokenPresented → Validated → Authorized`, or stops at the
//! first failed checkpoint with a [`Rejection`]. It never writes to the store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{CredentialStore, Principal, Role, TokenService};

/// What an operation demands of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRequirement {
    /// Any valid token for an existing identity.
    Authenticated,
    /// Additionally, the identity's role must satisfy this role.
    Role(Role),
}

/// Why the gate refused a request.
///
/// The variants are internal detail for logs and tests. Callers see only the
/// coarser [`RejectionClass`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("no bearer credential presented")]
    MissingCredential,

    #[error("token invalid or expired")]
    InvalidOrExpiredToken,

    #[error("token subject no longer exists")]
    UnknownSubject,

    #[error("role does not permit this operation")]
    InsufficientRole,

    #[error("credential store unavailable")]
    StoreUnavailable,
}

/// Externally visible outcome of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionClass {
    Unauthenticated,
    Forbidden,
    Unavailable,
}

impl Rejection {
    pub fn class(&self) -> RejectionClass {
        match self {
            Rejection::MissingCredential
            | Rejection::InvalidOrExpiredToken
            | Rejection::UnknownSubject => RejectionClass::Unauthenticated,
            Rejection::InsufficientRole => RejectionClass::Forbidden,
            Rejection::StoreUnavailable => RejectionClass::Unavailable,
        }
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme name is matched case-insensitively (RFC 7235). Returns `None`
/// for a missing header, a non-`Bearer` scheme, or an empty token.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() { None } else { Some(token) }
}

#[derive(Clone)]
pub struct AccessGate {
    tokens: Arc<TokenService>,
    store: Arc<dyn CredentialStore>,
}

impl AccessGate {
    pub fn new(tokens: Arc<TokenService>, store: Arc<dyn CredentialStore>) -> Self {
        Self { tokens, store }
    }

    /// Run every checkpoint for one request.
    ///
    /// `token` is the already-extracted bearer token (see [`bearer_token`]).
    pub async fn admit(
        &self,
        token: Option<&str>,
        requirement: AccessRequirement,
        now: DateTime<Utc>,
    ) -> Result<Principal, Rejection> {
        let token = token.ok_or(Rejection::MissingCredential)?;

        let subject = self.tokens.validate(token, now).map_err(|e| {
            debug!(reason = %e, "token rejected");
            Rejection::InvalidOrExpiredToken
        })?;

        let identity = match self.store.find_by_id(subject).await {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                debug!(subject = %subject, "token subject not found");
                return Err(Rejection::UnknownSubject);
            }
            Err(e) => {
                warn!(subject = %subject, error = %e, "credential store lookup failed");
                return Err(Rejection::StoreUnavailable);
            }
        };

        if let AccessRequirement::Role(required) = requirement {
            if !identity.role.satisfies(required) {
                debug!(subject = %subject, role = %identity.role, required = %required, "insufficient role");
                return Err(Rejection::InsufficientRole);
            }
        }

        Ok(Principal::from_identity(&identity))
    }
}
