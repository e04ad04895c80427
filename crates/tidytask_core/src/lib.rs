//! Core domain logic for TidyTask.
//! This crate is the single source of truth for business invariants.

pub mod app;
pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use app::{App, Notice, Screen, TaskListPresenter, TaskRow};
pub use auth::{AuthError, AuthGateway, AuthResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::session::Session;
pub use model::task::{TaskId, TaskRecord, TaskValidationError};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use store::{StoreError, StoreResult, SubscriptionId, TaskSnapshot, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
