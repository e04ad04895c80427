//! Authentication gateway: accounts, sessions, session-change feed.
//!
//! # Responsibility
//! - Provide sign-up, sign-in and sign-out over stored accounts.
//! - Broadcast every session transition to registered observers.
//!
//! # Invariants
//! - At most one session is active at a time.
//! - Observers always receive the current state immediately on subscribe.
//! - Credential failures are opaque: unknown email and wrong password are
//!   indistinguishable to the caller.

pub mod gateway;
pub(crate) mod password;

pub use gateway::{AuthError, AuthGateway, AuthResult};
