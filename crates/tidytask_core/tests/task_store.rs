use rusqlite::Connection;
use tidytask_core::db::open_db_in_memory;
use tidytask_core::{AuthGateway, StoreError, TaskStore, TaskValidationError};
use uuid::Uuid;

fn owner_for(conn: &Connection, email: &str) -> Uuid {
    let mut gateway = AuthGateway::try_new(conn).unwrap();
    gateway.create_account(email, "secret").unwrap().user_id
}

fn todo_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM todos;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn add_task_trims_text_and_defaults_completed_to_false() {
    let conn = open_db_in_memory().unwrap();
    let owner = owner_for(&conn, "user@example.com");
    let mut store = TaskStore::try_new(&conn).unwrap();

    let id = store.add_task(owner, "  Walk dog  ").unwrap();

    let tasks = store.list_for_owner(owner).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, id);
    assert_eq!(tasks[0].task, "Walk dog");
    assert!(!tasks[0].completed);
    assert_eq!(tasks[0].owner_id, owner);
}

#[test]
fn blank_task_text_is_rejected_without_a_create_request() {
    let conn = open_db_in_memory().unwrap();
    let owner = owner_for(&conn, "user@example.com");
    let mut store = TaskStore::try_new(&conn).unwrap();

    let err = store.add_task(owner, "   ").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(TaskValidationError::BlankTask)
    ));
    assert_eq!(todo_count(&conn), 0);
}

#[test]
fn update_replaces_text_with_trimmed_value() {
    let conn = open_db_in_memory().unwrap();
    let owner = owner_for(&conn, "user@example.com");
    let mut store = TaskStore::try_new(&conn).unwrap();
    let id = store.add_task(owner, "Buy milk").unwrap();

    store.update_task_text(id, "  Buy oat milk  ").unwrap();

    let tasks = store.list_for_owner(owner).unwrap();
    assert_eq!(tasks[0].task, "Buy oat milk");
}

#[test]
fn blank_update_is_rejected_and_leaves_the_record_untouched() {
    let conn = open_db_in_memory().unwrap();
    let owner = owner_for(&conn, "user@example.com");
    let mut store = TaskStore::try_new(&conn).unwrap();
    let id = store.add_task(owner, "Buy milk").unwrap();

    let err = store.update_task_text(id, " \t ").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(TaskValidationError::BlankTask)
    ));

    let tasks = store.list_for_owner(owner).unwrap();
    assert_eq!(tasks[0].task, "Buy milk");
}

#[test]
fn delete_removes_exactly_the_targeted_record() {
    let conn = open_db_in_memory().unwrap();
    let owner = owner_for(&conn, "user@example.com");
    let mut store = TaskStore::try_new(&conn).unwrap();
    let first = store.add_task(owner, "Buy milk").unwrap();
    let second = store.add_task(owner, "Walk dog").unwrap();

    store.delete_task(first).unwrap();

    let tasks = store.list_for_owner(owner).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, second);
    assert_eq!(tasks[0].task, "Walk dog");
}

#[test]
fn update_and_delete_report_missing_records() {
    let conn = open_db_in_memory().unwrap();
    owner_for(&conn, "user@example.com");
    let mut store = TaskStore::try_new(&conn).unwrap();
    let missing = Uuid::new_v4();

    assert!(matches!(
        store.update_task_text(missing, "text").unwrap_err(),
        StoreError::TaskNotFound(id) if id == missing
    ));
    assert!(matches!(
        store.delete_task(missing).unwrap_err(),
        StoreError::TaskNotFound(id) if id == missing
    ));
}

#[test]
fn listing_is_scoped_to_the_owner_and_insertion_ordered() {
    let conn = open_db_in_memory().unwrap();
    let first_owner = owner_for(&conn, "first@example.com");
    let second_owner = owner_for(&conn, "second@example.com");
    let mut store = TaskStore::try_new(&conn).unwrap();

    store.add_task(first_owner, "mine a").unwrap();
    store.add_task(second_owner, "theirs").unwrap();
    store.add_task(first_owner, "mine b").unwrap();

    let mine = store.list_for_owner(first_owner).unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].task, "mine a");
    assert_eq!(mine[1].task, "mine b");
    assert!(mine.iter().all(|record| record.owner_id == first_owner));
}
