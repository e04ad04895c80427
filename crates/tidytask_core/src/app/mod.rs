//! Application layer: session control, list presentation, form handlers.
//!
//! # Responsibility
//! - React to session transitions and scope the live task query to them.
//! - Keep the visible task list in sync with store snapshots.
//! - Expose the four form handlers (sign-up, login, logout, add-task)
//!   plus the per-row delete and inline-edit controls.
//!
//! # Invariants
//! - At most one live task subscription exists per signed-in session.
//! - The live subscription is the single source of list updates; handlers
//!   never refresh the list manually.

pub mod controller;
pub mod notice;
pub mod presenter;

pub use controller::{App, Screen};
pub use notice::Notice;
pub use presenter::{TaskListPresenter, TaskRow};
