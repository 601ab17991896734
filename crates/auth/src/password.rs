//! Password hashing, verification, and the minimum-strength policy.
//!
//! Hashes are Argon2id PHC strings with a random salt embedded in the output, so
//! hashing the same plaintext twice yields different stored values.

use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use thiserror::Error;

/// Minimum number of characters accepted for a new password.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("password hashing failed: {0}")]
pub struct HashError(String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("password must be at least {MIN_PASSWORD_LEN} characters long")]
pub struct WeakPassword;

/// Hash a plaintext password for storage.
pub fn hash(plaintext: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| HashError(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Check a plaintext password against a stored hash.
///
/// The digest comparison is constant-time. A malformed stored hash yields `false`.
pub fn verify(plaintext: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Burn one verification against a fixed hash.
///
/// Used when no identity matches the presented email so that the time spent
/// does not reveal whether the email is registered. Always returns `false`.
pub fn verify_against_dummy(plaintext: &str) -> bool {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    let dummy = DUMMY.get_or_init(|| hash("workforce-dummy-password").ok());
    if let Some(dummy) = dummy {
        let _ = verify(plaintext, dummy);
    }
    false
}

/// Enforce the minimum-strength rule for any newly chosen password.
pub fn check_policy(plaintext: &str) -> Result<(), WeakPassword> {
    if plaintext.chars().count() < MIN_PASSWORD_LEN {
        return Err(WeakPassword);
    }
    Ok(())
}
