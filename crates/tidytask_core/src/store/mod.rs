//! Live task store: the `todos` collection plus change notification.
//!
//! # Responsibility
//! - Expose create/update/delete over task records.
//! - Deliver a full owner-scoped snapshot to subscribers on every change.
//!
//! # Invariants
//! - Every subscriber receives the current snapshot immediately on
//!   subscribe, then one snapshot per subsequent matching mutation.
//! - Snapshots are delivered in mutation arrival order.
//! - Subscriptions are explicit scoped resources released via
//!   `unsubscribe`.

pub mod task_store;

pub use task_store::{StoreError, StoreResult, SubscriptionId, TaskSnapshot, TaskStore};
