//! Salted password hashing for teacher accounts.
//!
//! Digests are stored as `salt$hex`. The format keeps the hashing scheme
//! swappable without touching the account tables.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    hash_with_salt(password, &salt)
}

fn hash_with_salt(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{}${}", salt, hex::encode(hasher.finalize()))
}

/// Check a password against a stored `salt$hex` digest.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, _)) => hash_with_salt(password, salt) == stored,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let stored = hash_password("secreto123");
        assert!(verify_password("secreto123", &stored));
        assert!(!verify_password("secreto124", &stored));
    }

    #[test]
    fn test_salts_differ_between_hashes() {
        let a = hash_password("secreto123");
        let b = hash_password("secreto123");
        assert_ne!(a, b);
        assert!(verify_password("secreto123", &a));
        assert!(verify_password("secreto123", &b));
    }

    #[test]
    fn test_malformed_stored_digest_never_verifies() {
        assert!(!verify_password("anything", "not-a-digest"));
        assert!(!verify_password("anything", ""));
    }
}
