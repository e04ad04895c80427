//! Task store facade over the task repository.
//!
//! # Responsibility
//! - Validate and persist task mutations.
//! - Maintain owner-filtered live queries and push fresh snapshots.
//!
//! # Invariants
//! - A mutation notifies only subscribers whose owner filter matches the
//!   mutated record's owner.
//! - Disconnected subscriber channels are pruned on the next delivery.

use crate::model::task::{TaskId, TaskRecord, TaskValidationError};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::{RepoError, RepoResult};
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{channel, Receiver, Sender};
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for task mutations and queries.
#[derive(Debug)]
pub enum StoreError {
    /// Task text failed validation; no request was issued.
    Validation(TaskValidationError),
    /// Target record does not exist.
    TaskNotFound(TaskId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::TaskNotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Handle identifying one live query registration.
pub type SubscriptionId = u64;

/// The ordered set of records matching one live query, as delivered by
/// one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    /// Owner the query is filtered by.
    pub owner_id: Uuid,
    /// Matching records in store order (`created_at ASC, rowid ASC`).
    pub tasks: Vec<TaskRecord>,
}

struct LiveQuery {
    id: SubscriptionId,
    owner_id: Uuid,
    sender: Sender<TaskSnapshot>,
}

/// Document-store facade: task CRUD plus owner-filtered live queries.
pub struct TaskStore<'conn> {
    repo: SqliteTaskRepository<'conn>,
    queries: Vec<LiveQuery>,
    next_subscription_id: SubscriptionId,
}

impl<'conn> TaskStore<'conn> {
    /// Creates a store over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self {
            repo: SqliteTaskRepository::try_new(conn)?,
            queries: Vec::new(),
            next_subscription_id: 1,
        })
    }

    /// Creates one task record for `owner_id`.
    ///
    /// # Contract
    /// - Text is trimmed before storage; blank trimmed text is rejected
    ///   without issuing a create request.
    /// - `completed` always starts `false`.
    pub fn add_task(&mut self, owner_id: Uuid, text: &str) -> StoreResult<TaskId> {
        let record = TaskRecord::new(owner_id, text)?;
        let id = self.repo.create_task(&record)?;
        info!("event=task_create module=store status=ok task_id={id} owner_id={owner_id}");
        self.notify_owner(owner_id);
        Ok(id)
    }

    /// Replaces the text of one task record.
    ///
    /// # Contract
    /// - Blank trimmed replacement is rejected without issuing an update.
    /// - Exactly one update request is issued for non-blank input.
    pub fn update_task_text(&mut self, id: TaskId, text: &str) -> StoreResult<()> {
        let owner_id = self.owner_of(id)?;
        self.repo.update_task_text(id, text)?;
        info!("event=task_update module=store status=ok task_id={id} owner_id={owner_id}");
        self.notify_owner(owner_id);
        Ok(())
    }

    /// Deletes exactly one task record by id.
    pub fn delete_task(&mut self, id: TaskId) -> StoreResult<()> {
        let owner_id = self.owner_of(id)?;
        self.repo.delete_task(id)?;
        info!("event=task_delete module=store status=ok task_id={id} owner_id={owner_id}");
        self.notify_owner(owner_id);
        Ok(())
    }

    /// Returns the current snapshot for one owner without subscribing.
    pub fn list_for_owner(&self, owner_id: Uuid) -> StoreResult<Vec<TaskRecord>> {
        Ok(self.repo.list_for_owner(owner_id)?)
    }

    /// Establishes a live query filtered by `owner_id`.
    ///
    /// The returned channel already carries the current snapshot; every
    /// later mutation touching this owner's set delivers a fresh one.
    pub fn subscribe(
        &mut self,
        owner_id: Uuid,
    ) -> StoreResult<(SubscriptionId, Receiver<TaskSnapshot>)> {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;

        let (tx, rx) = channel();
        let initial = TaskSnapshot {
            owner_id,
            tasks: self.repo.list_for_owner(owner_id)?,
        };
        let _ = tx.send(initial);

        self.queries.push(LiveQuery {
            id,
            owner_id,
            sender: tx,
        });
        info!(
            "event=subscribe module=store status=ok subscription_id={id} owner_id={owner_id} active={}",
            self.queries.len()
        );
        Ok((id, rx))
    }

    /// Releases one live query registration.
    ///
    /// Unknown ids are ignored so teardown paths stay idempotent.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        let before = self.queries.len();
        self.queries.retain(|query| query.id != id);
        if self.queries.len() < before {
            info!(
                "event=unsubscribe module=store status=ok subscription_id={id} active={}",
                self.queries.len()
            );
        }
    }

    /// Returns the number of live query registrations.
    pub fn active_subscriptions(&self) -> usize {
        self.queries.len()
    }

    fn owner_of(&self, id: TaskId) -> StoreResult<Uuid> {
        match self.repo.get_task(id)? {
            Some(record) => Ok(record.owner_id),
            None => Err(StoreError::TaskNotFound(id)),
        }
    }

    fn notify_owner(&mut self, owner_id: Uuid) {
        if !self.queries.iter().any(|query| query.owner_id == owner_id) {
            return;
        }

        let snapshot = match self.repo.list_for_owner(owner_id) {
            Ok(tasks) => TaskSnapshot { owner_id, tasks },
            Err(err) => {
                // The mutation already committed; a failed snapshot read
                // only skips this notification round.
                error!(
                    "event=notify module=store status=error owner_id={owner_id} error={err}"
                );
                return;
            }
        };

        self.queries.retain(|query| {
            query.owner_id != owner_id || query.sender.send(snapshot.clone()).is_ok()
        });
    }
}
