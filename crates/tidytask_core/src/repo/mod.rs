//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from gateway/store orchestration.
//!
//! # Invariants
//! - Repository writes must validate records before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `EmailTaken`) in
//!   addition to DB transport errors.

use crate::db::DbError;
use crate::model::task::TaskValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod account_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(Uuid),
    EmailTaken(String),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::EmailTaken(email) => write!(f, "email is already registered: {email}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Verifies that the connection has been migrated and carries `table`.
///
/// Repositories call this at construction time so that later operations
/// can assume a usable schema.
pub(crate) fn ensure_schema_ready(conn: &Connection, table: &'static str) -> RepoResult<()> {
    let actual_version =
        conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let expected_version = crate::db::migrations::latest_version();
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
        [table],
        |row| row.get::<_, i64>(0),
    )? > 0;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(table));
    }

    Ok(())
}
