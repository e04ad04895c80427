//! Auth gateway implementation over the account repository.
//!
//! # Responsibility
//! - Create accounts, establish/destroy sessions, verify credentials.
//! - Deliver session transitions to every live observer channel.
//!
//! # Invariants
//! - Successful sign-up signs the new account in (matching the observed
//!   behavior of hosted identity providers).
//! - `notify` delivers to observers in registration order and drops
//!   observers whose receiving end has gone away.

use crate::auth::password::{generate_salt, hash_password, verify_password};
use crate::model::account::{normalize_email, Account};
use crate::model::session::Session;
use crate::repo::account_repo::{AccountRepository, SqliteAccountRepository};
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{channel, Receiver, Sender};

pub type AuthResult<T> = Result<T, AuthError>;

/// Gateway-level authentication errors.
#[derive(Debug)]
pub enum AuthError {
    /// A required form field is blank.
    MissingField(&'static str),
    /// Sign-up target email is already registered.
    EmailTaken(String),
    /// Unknown email or wrong password; deliberately opaque.
    InvalidCredentials,
    /// Sign-out requested without an active session.
    NotSignedIn,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::EmailTaken(email) => write!(f, "email is already registered: {email}"),
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::NotSignedIn => write!(f, "no user is signed in"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::EmailTaken(email) => Self::EmailTaken(email),
            other => Self::Repo(other),
        }
    }
}

/// In-process identity service backed by the `accounts` table.
pub struct AuthGateway<'conn> {
    accounts: SqliteAccountRepository<'conn>,
    session: Option<Session>,
    observers: Vec<Sender<Option<Session>>>,
}

impl<'conn> AuthGateway<'conn> {
    /// Creates a gateway over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self {
            accounts: SqliteAccountRepository::try_new(conn)?,
            session: None,
            observers: Vec::new(),
        })
    }

    /// Registers a new account and signs it in.
    ///
    /// # Contract
    /// - Email is normalized (trimmed, lowercased) before storage.
    /// - On success the session-change feed fires with the new session.
    ///
    /// # Errors
    /// - `MissingField` when email or password is blank.
    /// - `EmailTaken` when the email is already registered.
    pub fn create_account(&mut self, email: &str, password: &str) -> AuthResult<Session> {
        let email = require_field("email", &normalize_email(email))?;
        require_field("password", password)?;

        let salt = generate_salt();
        let hash = hash_password(password, &salt);
        let account = Account::new(email, salt, hash);
        let account_id = self.accounts.create_account(&account)?;

        info!("event=sign_up module=auth status=ok account_id={account_id}");
        Ok(self.establish(Session {
            user_id: account.id,
            email: account.email,
        }))
    }

    /// Verifies credentials and establishes a session.
    ///
    /// A sign-in while already signed in replaces the current session and
    /// notifies observers with the new value.
    ///
    /// # Errors
    /// - `MissingField` when email or password is blank.
    /// - `InvalidCredentials` for unknown email or wrong password.
    pub fn sign_in(&mut self, email: &str, password: &str) -> AuthResult<Session> {
        let email = require_field("email", &normalize_email(email))?;
        require_field("password", password)?;

        let account = match self.accounts.find_by_email(&email)? {
            Some(account) => account,
            None => {
                warn!("event=sign_in module=auth status=error error_code=invalid_credentials");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !verify_password(password, &account.password_salt, &account.password_hash) {
            warn!("event=sign_in module=auth status=error error_code=invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        }

        info!(
            "event=sign_in module=auth status=ok account_id={}",
            account.id
        );
        Ok(self.establish(Session {
            user_id: account.id,
            email: account.email,
        }))
    }

    /// Destroys the current session.
    ///
    /// # Errors
    /// - `NotSignedIn` when no session is active.
    pub fn sign_out(&mut self) -> AuthResult<()> {
        let session = self.session.take().ok_or(AuthError::NotSignedIn)?;
        info!(
            "event=sign_out module=auth status=ok account_id={}",
            session.user_id
        );
        self.notify();
        Ok(())
    }

    /// Returns the active session, if any.
    pub fn current_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Registers a session-change observer.
    ///
    /// The returned channel immediately carries the current state, then
    /// one value per subsequent transition.
    pub fn subscribe(&mut self) -> Receiver<Option<Session>> {
        let (tx, rx) = channel();
        // First delivery mirrors page-load behavior: the observer learns
        // the actual initial state from the feed, not from a default.
        let _ = tx.send(self.session.clone());
        self.observers.push(tx);
        rx
    }

    fn establish(&mut self, session: Session) -> Session {
        self.session = Some(session.clone());
        self.notify();
        session
    }

    fn notify(&mut self) {
        let state = self.session.clone();
        self.observers
            .retain(|observer| observer.send(state.clone()).is_ok());
    }
}

fn require_field(name: &'static str, value: &str) -> AuthResult<String> {
    if value.trim().is_empty() {
        return Err(AuthError::MissingField(name));
    }
    Ok(value.to_string())
}
