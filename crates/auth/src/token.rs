//! Signed, time-bounded identity tokens (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use thiserror::Error;
use tracing::debug;

use workforce_core::UserId;

use crate::claims::{TokenClaims, validate_claims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not match")]
    SignatureMismatch,

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued in the future)")]
    NotYetValid,

    #[error("token lifetime puts expiry outside the representable range")]
    ExpiryOutOfRange,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Token signing configuration.
///
/// The secret is always supplied explicitly by the caller; there is no built-in default.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenConfig {
    pub const DEFAULT_TTL_HOURS: i64 = 24;

    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::hours(Self::DEFAULT_TTL_HOURS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl core::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// A freshly issued token plus its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates identity tokens.
///
/// Stateless apart from the read-only key material, so one instance is shared
/// across all requests.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller-supplied clock in `validate_claims`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(&config.secret),
            decoding: DecodingKey::from_secret(&config.secret),
            validation,
            ttl: config.ttl,
        }
    }

    /// Issue a token for `subject`, valid from `now` until `now + ttl`.
    pub fn issue(&self, subject: UserId, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = TokenClaims {
            sub: subject,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        debug!(subject = %subject, expires_at = %expires_at, "issued token");

        Ok(IssuedToken { token, expires_at })
    }

    /// Validate a token and return its subject.
    ///
    /// The signature is verified before any claim is looked at; only then is the
    /// expiry compared with `now`.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, TokenError> {
        let decoded = decode::<TokenClaims>(token, &self.decoding, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            },
        )?;

        validate_claims(&decoded.claims, now)?;
        Ok(decoded.claims.sub)
    }
}
