//! Stored account credentials.
//!
//! # Responsibility
//! - Define the persisted shape of one account row.
//!
//! # Invariants
//! - `email` is stored normalized (trimmed, lowercased) and is unique.
//! - Password material is stored as salted hash only, never plaintext.

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// One persisted account. Internal to the auth gateway; callers only
/// ever see a `Session` projection of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Stable account identifier.
    pub id: Uuid,
    /// Normalized email address, unique across accounts.
    pub email: String,
    /// Hex-encoded random salt.
    pub password_salt: String,
    /// Hex-encoded salted password hash.
    pub password_hash: String,
    /// Unix epoch milliseconds at creation time.
    pub created_at: i64,
}

impl Account {
    /// Creates a new account row with a generated stable ID.
    pub fn new(
        email: impl Into<String>,
        password_salt: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_salt: password_salt.into(),
            password_hash: password_hash.into(),
            created_at: now_epoch_ms(),
        }
    }
}

/// Normalizes an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
