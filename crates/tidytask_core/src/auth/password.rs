//! Salted password hashing helpers.
//!
//! # Invariants
//! - Every account gets a fresh random salt.
//! - Stored material is hex-encoded `sha256(salt || password)`; plaintext
//!   never leaves the gateway call frame.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Generates a fresh hex-encoded random salt.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    hex::encode(salt)
}

/// Hashes a password with the provided hex-encoded salt.
pub fn hash_password(password: &str, salt_hex: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks a candidate password against stored salt and hash.
pub fn verify_password(password: &str, salt_hex: &str, hash_hex: &str) -> bool {
    hash_password(password, salt_hex) == hash_hex
}

#[cfg(test)]
mod tests {
    use super::{generate_salt, hash_password, verify_password};

    #[test]
    fn hash_is_deterministic_for_same_salt() {
        let salt = generate_salt();
        assert_eq!(hash_password("secret", &salt), hash_password("secret", &salt));
    }

    #[test]
    fn different_salts_produce_different_hashes() {
        let first = generate_salt();
        let second = generate_salt();
        assert_ne!(first, second);
        assert_ne!(hash_password("secret", &first), hash_password("secret", &second));
    }

    #[test]
    fn verify_accepts_correct_and_rejects_wrong_password() {
        let salt = generate_salt();
        let hash = hash_password("secret", &salt);
        assert!(verify_password("secret", &salt, &hash));
        assert!(!verify_password("other", &salt, &hash));
    }
}
