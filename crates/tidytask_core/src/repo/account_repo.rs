//! Account repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist account credential rows for the auth gateway.
//! - Map the unique-email constraint to a semantic error.
//!
//! # Invariants
//! - `email` values are stored normalized by the caller.
//! - Uniqueness violations surface as `RepoError::EmailTaken`, never as a
//!   raw SQLite constraint error.

use crate::model::account::Account;
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, ErrorCode, Row};
use uuid::Uuid;

const ACCOUNT_SELECT_SQL: &str = "SELECT
    uuid,
    email,
    password_salt,
    password_hash,
    created_at
FROM accounts";

/// Repository interface for account persistence.
pub trait AccountRepository {
    fn create_account(&self, account: &Account) -> RepoResult<Uuid>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>>;
}

/// SQLite-backed account repository.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` when the `accounts` table is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, "accounts")?;
        Ok(Self { conn })
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn create_account(&self, account: &Account) -> RepoResult<Uuid> {
        let inserted = self.conn.execute(
            "INSERT INTO accounts (uuid, email, password_salt, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                account.id.to_string(),
                account.email.as_str(),
                account.password_salt.as_str(),
                account.password_hash.as_str(),
                account.created_at,
            ],
        );

        match inserted {
            Ok(_) => Ok(account.id),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(RepoError::EmailTaken(account.email.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACCOUNT_SELECT_SQL} WHERE email = ?1;"))?;

        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_account_row(row)?));
        }

        Ok(None)
    }
}

fn parse_account_row(row: &Row<'_>) -> RepoResult<Account> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in accounts.uuid"))
    })?;

    Ok(Account {
        id,
        email: row.get("email")?,
        password_salt: row.get("password_salt")?,
        password_hash: row.get("password_hash")?,
        created_at: row.get("created_at")?,
    })
}
