//! Task record domain model.
//!
//! # Responsibility
//! - Define the canonical shape of one `todos` record.
//! - Enforce the non-blank task text rule on every write path.
//!
//! # Invariants
//! - `id` is stable and never reused for another record.
//! - `task` is stored trimmed and is never blank.
//! - `owner_id` identifies the account that owns the record.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for one task record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Validation failures for task text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task text is empty after trimming.
    BlankTask,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTask => write!(f, "task text cannot be blank"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical record for one task in the `todos` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTaskRecord")]
pub struct TaskRecord {
    /// Stable global ID used for update/delete targeting.
    pub id: TaskId,
    /// Trimmed task text. Never blank.
    pub task: String,
    /// Completion flag. Persisted, but no handler toggles it yet.
    pub completed: bool,
    /// Account that owns this record.
    pub owner_id: Uuid,
    /// Unix epoch milliseconds at creation time.
    pub created_at: i64,
}

impl TaskRecord {
    /// Creates a new record with a generated stable ID and trimmed text.
    ///
    /// # Errors
    /// - `TaskValidationError::BlankTask` when the trimmed text is empty.
    pub fn new(owner_id: Uuid, text: &str) -> Result<Self, TaskValidationError> {
        let task = normalize_task_text(text)?;
        Ok(Self {
            id: Uuid::new_v4(),
            task,
            completed: false,
            owner_id,
            created_at: now_epoch_ms(),
        })
    }

    /// Re-checks the invariants on an already constructed record.
    ///
    /// Used by read paths to reject invalid persisted state.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.task.trim().is_empty() {
            return Err(TaskValidationError::BlankTask);
        }
        Ok(())
    }
}

/// Unvalidated wire shape; deserialization funnels through `TryFrom` so
/// external payloads cannot smuggle in blank task text.
#[derive(Deserialize)]
struct RawTaskRecord {
    id: TaskId,
    task: String,
    completed: bool,
    owner_id: Uuid,
    created_at: i64,
}

impl TryFrom<RawTaskRecord> for TaskRecord {
    type Error = TaskValidationError;

    fn try_from(raw: RawTaskRecord) -> Result<Self, Self::Error> {
        let record = Self {
            id: raw.id,
            task: raw.task,
            completed: raw.completed,
            owner_id: raw.owner_id,
            created_at: raw.created_at,
        };
        record.validate()?;
        Ok(record)
    }
}

/// Trims task text and rejects blank input.
pub fn normalize_task_text(text: &str) -> Result<String, TaskValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::BlankTask);
    }
    Ok(trimmed.to_string())
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{normalize_task_text, TaskRecord, TaskValidationError};
    use uuid::Uuid;

    #[test]
    fn new_trims_text_and_defaults_completed_to_false() {
        let owner = Uuid::new_v4();
        let record = TaskRecord::new(owner, "  Walk dog  ").expect("non-blank text");
        assert_eq!(record.task, "Walk dog");
        assert!(!record.completed);
        assert_eq!(record.owner_id, owner);
    }

    #[test]
    fn new_rejects_blank_text() {
        let err = TaskRecord::new(Uuid::new_v4(), "   ").expect_err("blank text must fail");
        assert_eq!(err, TaskValidationError::BlankTask);
    }

    #[test]
    fn normalize_rejects_whitespace_only_input() {
        assert!(normalize_task_text("\t \n").is_err());
        assert_eq!(normalize_task_text(" Buy milk ").unwrap(), "Buy milk");
    }
}
