//! Task list presenter: snapshot-to-rows projection with inline editing.
//!
//! # Responsibility
//! - Rebuild the visible row list from every delivered snapshot.
//! - Track per-row edit state (`viewing <-> editing`) without blocking.
//!
//! # Invariants
//! - The row list is a disposable projection; each snapshot replaces it
//!   wholesale in store order.
//! - Edit state survives a re-render while its row is still present and
//!   is dropped when the row disappears from the snapshot.

use crate::model::task::TaskId;
use crate::store::TaskSnapshot;
use std::collections::HashMap;

/// One visible list entry with its edit affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    /// Record id the delete and modify controls target.
    pub id: TaskId,
    /// Current task text as delivered by the store.
    pub text: String,
    /// Completion flag (rendered, never toggled by any handler).
    pub completed: bool,
    /// Edit buffer when this row is in editing state.
    pub editing: Option<String>,
}

/// Projection of the latest snapshot into renderable rows.
#[derive(Debug, Default)]
pub struct TaskListPresenter {
    rows: Vec<TaskRow>,
}

impl TaskListPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the row list from a snapshot.
    ///
    /// Rows are replaced in snapshot order; edit buffers are carried over
    /// for ids that are still present.
    pub fn apply_snapshot(&mut self, snapshot: &TaskSnapshot) {
        let mut edit_buffers: HashMap<TaskId, String> = self
            .rows
            .drain(..)
            .filter_map(|row| row.editing.map(|buffer| (row.id, buffer)))
            .collect();

        self.rows = snapshot
            .tasks
            .iter()
            .map(|record| TaskRow {
                id: record.id,
                text: record.task.clone(),
                completed: record.completed,
                editing: edit_buffers.remove(&record.id),
            })
            .collect();
    }

    /// Returns the rendered rows in store order.
    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    /// Returns one row by record id.
    pub fn row(&self, id: TaskId) -> Option<&TaskRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Switches one row to editing state, seeding the buffer with the
    /// current text. Returns `false` for unknown ids.
    pub fn begin_edit(&mut self, id: TaskId) -> bool {
        match self.rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                if row.editing.is_none() {
                    row.editing = Some(row.text.clone());
                }
                true
            }
            None => false,
        }
    }

    /// Returns one row back to viewing state. Returns `false` for ids
    /// that are unknown or not currently editing.
    pub fn cancel_edit(&mut self, id: TaskId) -> bool {
        match self.rows.iter_mut().find(|row| row.id == id) {
            Some(row) if row.editing.is_some() => {
                row.editing = None;
                true
            }
            _ => false,
        }
    }

    /// Drops all rows, e.g. on sign-out.
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::TaskListPresenter;
    use crate::model::task::TaskRecord;
    use crate::store::TaskSnapshot;
    use uuid::Uuid;

    fn snapshot_of(owner_id: Uuid, texts: &[&str]) -> TaskSnapshot {
        TaskSnapshot {
            owner_id,
            tasks: texts
                .iter()
                .map(|text| TaskRecord::new(owner_id, text).expect("non-blank text"))
                .collect(),
        }
    }

    #[test]
    fn apply_snapshot_replaces_rows_in_order() {
        let owner = Uuid::new_v4();
        let mut presenter = TaskListPresenter::new();

        presenter.apply_snapshot(&snapshot_of(owner, &["Buy milk"]));
        assert_eq!(presenter.rows().len(), 1);
        assert_eq!(presenter.rows()[0].text, "Buy milk");

        presenter.apply_snapshot(&snapshot_of(owner, &["Buy milk", "Walk dog"]));
        assert_eq!(presenter.rows().len(), 2);
        assert_eq!(presenter.rows()[1].text, "Walk dog");
    }

    #[test]
    fn edit_state_survives_rerender_while_row_is_present() {
        let owner = Uuid::new_v4();
        let mut presenter = TaskListPresenter::new();
        let snapshot = snapshot_of(owner, &["Buy milk"]);
        let id = snapshot.tasks[0].id;

        presenter.apply_snapshot(&snapshot);
        assert!(presenter.begin_edit(id));
        assert_eq!(
            presenter.row(id).and_then(|row| row.editing.as_deref()),
            Some("Buy milk")
        );

        presenter.apply_snapshot(&snapshot);
        assert_eq!(
            presenter.row(id).and_then(|row| row.editing.as_deref()),
            Some("Buy milk")
        );
    }

    #[test]
    fn edit_state_is_dropped_when_row_disappears() {
        let owner = Uuid::new_v4();
        let mut presenter = TaskListPresenter::new();
        let snapshot = snapshot_of(owner, &["Buy milk"]);
        let id = snapshot.tasks[0].id;

        presenter.apply_snapshot(&snapshot);
        presenter.begin_edit(id);

        presenter.apply_snapshot(&snapshot_of(owner, &["Walk dog"]));
        assert!(presenter.row(id).is_none());
        assert!(!presenter.cancel_edit(id));
    }

    #[test]
    fn begin_edit_rejects_unknown_id_and_cancel_restores_viewing() {
        let owner = Uuid::new_v4();
        let mut presenter = TaskListPresenter::new();
        let snapshot = snapshot_of(owner, &["Buy milk"]);
        let id = snapshot.tasks[0].id;

        presenter.apply_snapshot(&snapshot);
        assert!(!presenter.begin_edit(Uuid::new_v4()));

        presenter.begin_edit(id);
        assert!(presenter.cancel_edit(id));
        assert!(presenter.row(id).map_or(false, |row| row.editing.is_none()));
        assert!(!presenter.cancel_edit(id));
    }
}
