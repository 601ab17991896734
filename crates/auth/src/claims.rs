use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use workforce_core::UserId;

use crate::TokenError;

/// Claims carried inside an identity token.
///
/// Timestamps are Unix seconds (`iat`/`exp`, as in RFC 7519). Everything else about
/// the caller (name, role) is resolved from the credential store on each request,
/// so the token stays a pure assertion of *who*, not *what they may do*.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject identifier.
    pub sub: UserId,

    /// Issued-at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,
}

/// Deterministically validate token claims against `now`.
///
/// Note: this validates the *claims* only. Signature verification happens in
/// [`crate::TokenService::validate`] before this is ever called.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.exp <= claims.iat {
        return Err(TokenError::Malformed);
    }
    let now = now.timestamp();
    if now < claims.iat {
        return Err(TokenError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims_at(issued: DateTime<Utc>, ttl: Duration) -> TokenClaims {
        TokenClaims {
            sub: UserId::new(),
            iat: issued.timestamp(),
            exp: (issued + ttl).timestamp(),
        }
    }

    #[test]
    fn valid_inside_window() {
        let t = Utc::now();
        let claims = claims_at(t, Duration::hours(24));
        assert_eq!(validate_claims(&claims, t), Ok(()));
        assert_eq!(validate_claims(&claims, t + Duration::hours(23)), Ok(()));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let t = Utc::now();
        let claims = claims_at(t, Duration::hours(24));
        let exp = DateTime::from_timestamp(claims.exp, 0).unwrap();
        assert_eq!(validate_claims(&claims, exp - Duration::seconds(1)), Ok(()));
        assert_eq!(validate_claims(&claims, exp), Err(TokenError::Expired));
    }

    #[test]
    fn inverted_window_is_malformed() {
        let t = Utc::now();
        let claims = TokenClaims {
            sub: UserId::new(),
            iat: t.timestamp(),
            exp: t.timestamp(),
        };
        assert_eq!(validate_claims(&claims, t), Err(TokenError::Malformed));
    }

    #[test]
    fn future_issue_time_is_rejected() {
        let t = Utc::now();
        let claims = claims_at(t + Duration::hours(1), Duration::hours(24));
        assert_eq!(validate_claims(&claims, t), Err(TokenError::NotYetValid));
    }
}
