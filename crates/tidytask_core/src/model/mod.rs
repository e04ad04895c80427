//! Domain model for accounts, sessions and task records.
//!
//! # Responsibility
//! - Define the canonical data structures used by core business logic.
//! - Keep validation rules next to the data they protect.
//!
//! # Invariants
//! - Every stored object is identified by a stable `Uuid`.
//! - Task deletion is a hard delete; the store keeps no tombstones.

pub mod account;
pub mod session;
pub mod task;
