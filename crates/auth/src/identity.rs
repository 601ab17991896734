//! Registered identities and the email value they are keyed by.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use workforce_core::{DomainError, UserId, normalize_email};

use crate::Role;

/// Case-normalized email address.
///
/// Construction trims surrounding whitespace and lower-cases the value, so two
/// spellings of the same mailbox always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        normalize_email(raw).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered user as held by the credential store.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    /// PHC-encoded password hash. Never the plaintext.
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn summary(&self) -> IdentitySummary {
        IdentitySummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.as_str().to_string(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

impl core::fmt::Debug for Identity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Public view of an identity (what the API returns and the client caches).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        let email = Email::parse("  Ann@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "ann@example.com");
    }

    #[test]
    fn email_requires_local_and_domain_parts() {
        for raw in ["", "ann", "@x.com", "ann@", "a@b@c", "an n@x.com"] {
            assert!(Email::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn debug_output_hides_password_hash() {
        let identity = Identity {
            id: UserId::new(),
            name: "Ann".to_string(),
            email: Email::parse("ann@x.com").unwrap(),
            password_hash: "$argon2id$v=19$secret-material".to_string(),
            role: Role::User,
            created_at: Utc::now(),
        };
        let rendered = format!("{identity:?}");
        assert!(!rendered.contains("secret-material"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn summary_serializes_camel_case_without_hash() {
        let identity = Identity {
            id: UserId::new(),
            name: "Ann".to_string(),
            email: Email::parse("ann@x.com").unwrap(),
            password_hash: "hash".to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(identity.summary()).unwrap();
        assert_eq!(json["role"], "admin");
        assert_eq!(json["email"], "ann@x.com");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }

    proptest! {
        #[test]
        fn email_case_variants_normalize_identically(
            local in "[a-zA-Z0-9._]{1,20}",
            domain in "[a-zA-Z0-9]{1,20}\\.[a-zA-Z]{2,6}",
        ) {
            let lower = Email::parse(&format!("{}@{}", local.to_lowercase(), domain.to_lowercase())).unwrap();
            let upper = Email::parse(&format!(" {}@{} ", local.to_uppercase(), domain.to_uppercase())).unwrap();
            prop_assert_eq!(lower, upper);
        }
    }
}
