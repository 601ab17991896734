//! `workforce-auth`: authentication and authorization core.
//!
//! Credential verification, token issuance and validation, and the access gate
//! that turns a bearer token into a resolved principal. This crate is decoupled
//! from HTTP and from any concrete storage backend.

pub mod claims;
pub mod credentials;
pub mod gate;
pub mod identity;
pub mod password;
pub mod principal;
pub mod roles;
pub mod service;
pub mod token;

pub use claims::{TokenClaims, validate_claims};
pub use credentials::{CredentialStore, NewIdentity, StoreError};
pub use gate::{AccessGate, AccessRequirement, Rejection, RejectionClass, bearer_token};
pub use identity::{Email, Identity, IdentitySummary};
pub use principal::Principal;
pub use roles::Role;
pub use service::{AuthError, AuthService, AuthSuccess, Credentials, Registration};
pub use token::{IssuedToken, TokenConfig, TokenError, TokenService};

#[cfg(test)]
pub(crate) mod testing;
