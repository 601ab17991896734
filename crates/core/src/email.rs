//! Email normalisation shared by identities and employee records.

use crate::error::{DomainError, DomainResult};

/// Trim and lower-case `raw`, then require exactly one `@` with text on both
/// sides and no interior whitespace.
pub fn normalize_email(raw: &str) -> DomainResult<String> {
    let email = raw.trim().to_lowercase();

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(DomainError::validation("email is not a valid address"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(normalize_email("  Ann@Example.COM ").unwrap(), "ann@example.com");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for raw in ["", "   ", "ann", "@x.com", "ann@", "a@b@c", "an n@x.com"] {
            assert!(
                matches!(normalize_email(raw), Err(DomainError::Validation(_))),
                "{raw:?} should be rejected"
            );
        }
    }
}
