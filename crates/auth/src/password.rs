//! Password hashing and verification (bcrypt).

use bcrypt::DEFAULT_COST;
use thiserror::Error;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted password length (bcrypt truncates at 72 bytes).
pub const MAX_PASSWORD_LENGTH: usize = 72;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password must be between {MIN_PASSWORD_LENGTH} and {MAX_PASSWORD_LENGTH} characters")]
    Length,

    #[error("hashing failed: {0}")]
    Hashing(String),
}

/// Hash a password with the default bcrypt cost.
///
/// CPU-heavy; callers on an async runtime should wrap this in
/// `spawn_blocking`.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

/// Hash with an explicit cost (tests use a low cost to stay fast).
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, PasswordError> {
    let len = password.len();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(PasswordError::Length);
    }
    bcrypt::hash(password, cost).map_err(|e| PasswordError::Hashing(e.to_string()))
}

/// Verify a password against a stored hash.
///
/// Malformed hashes verify as `false` rather than erroring — login treats
/// every failure identically ("Invalid credentials").
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password_with_cost("correct horse battery", 4).unwrap();
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn short_passwords_rejected() {
        assert!(matches!(
            hash_password_with_cost("short", 4),
            Err(PasswordError::Length)
        ));
    }

    #[test]
    fn malformed_hash_verifies_false() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
