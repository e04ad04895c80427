//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `todos` collection.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must validate task text before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Owner-scoped listing is ordered `created_at ASC, rowid ASC` so every
//!   snapshot delivered to subscribers is stable insertion order.

use crate::model::task::{normalize_task_text, TaskId, TaskRecord};
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    task,
    completed,
    owner_id,
    created_at
FROM todos";

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    fn create_task(&self, record: &TaskRecord) -> RepoResult<TaskId>;
    fn update_task_text(&self, id: TaskId, text: &str) -> RepoResult<()>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<TaskRecord>>;
    fn list_for_owner(&self, owner_id: Uuid) -> RepoResult<Vec<TaskRecord>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` when the `todos` table is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, "todos")?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, record: &TaskRecord) -> RepoResult<TaskId> {
        record.validate()?;

        self.conn.execute(
            "INSERT INTO todos (uuid, task, completed, owner_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                record.id.to_string(),
                record.task.as_str(),
                bool_to_int(record.completed),
                record.owner_id.to_string(),
                record.created_at,
            ],
        )?;

        Ok(record.id)
    }

    fn update_task_text(&self, id: TaskId, text: &str) -> RepoResult<()> {
        let task = normalize_task_text(text)?;

        let changed = self.conn.execute(
            "UPDATE todos SET task = ?1 WHERE uuid = ?2;",
            params![task, id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<TaskRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_for_owner(&self, owner_id: Uuid) -> RepoResult<Vec<TaskRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE owner_id = ?1
             ORDER BY created_at ASC, rowid ASC;"
        ))?;

        let mut rows = stmt.query([owner_id.to_string()])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_task_row(row)?);
        }

        Ok(records)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<TaskRecord> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in todos.uuid"))
    })?;

    let owner_text: String = row.get("owner_id")?;
    let owner_id = Uuid::parse_str(&owner_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{owner_text}` in todos.owner_id"
        ))
    })?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in todos.completed"
            )));
        }
    };

    let record = TaskRecord {
        id,
        task: row.get("task")?,
        completed,
        owner_id,
        created_at: row.get("created_at")?,
    };
    record.validate()?;
    Ok(record)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
