use rusqlite::Connection;
use std::sync::mpsc::TryRecvError;
use tidytask_core::db::open_db_in_memory;
use tidytask_core::{AuthGateway, TaskStore};
use uuid::Uuid;

fn owner_for(conn: &Connection, email: &str) -> Uuid {
    let mut gateway = AuthGateway::try_new(conn).unwrap();
    gateway.create_account(email, "secret").unwrap().user_id
}

#[test]
fn subscribe_delivers_the_current_snapshot_immediately() {
    let conn = open_db_in_memory().unwrap();
    let owner = owner_for(&conn, "user@example.com");
    let mut store = TaskStore::try_new(&conn).unwrap();
    store.add_task(owner, "Buy milk").unwrap();

    let (_, feed) = store.subscribe(owner).unwrap();

    let snapshot = feed.try_recv().unwrap();
    assert_eq!(snapshot.owner_id, owner);
    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.tasks[0].task, "Buy milk");
    assert!(matches!(feed.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn each_mutation_delivers_exactly_one_fresh_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let owner = owner_for(&conn, "user@example.com");
    let mut store = TaskStore::try_new(&conn).unwrap();
    let (_, feed) = store.subscribe(owner).unwrap();
    feed.try_recv().unwrap(); // initial snapshot

    let id = store.add_task(owner, "Buy milk").unwrap();
    let after_add = feed.try_recv().unwrap();
    assert_eq!(after_add.tasks.len(), 1);
    assert!(matches!(feed.try_recv(), Err(TryRecvError::Empty)));

    store.update_task_text(id, "Buy oat milk").unwrap();
    let after_update = feed.try_recv().unwrap();
    assert_eq!(after_update.tasks[0].task, "Buy oat milk");
    assert!(matches!(feed.try_recv(), Err(TryRecvError::Empty)));

    store.delete_task(id).unwrap();
    let after_delete = feed.try_recv().unwrap();
    assert!(after_delete.tasks.is_empty());
    assert!(matches!(feed.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn notifications_are_scoped_to_the_owner_filter() {
    let conn = open_db_in_memory().unwrap();
    let first_owner = owner_for(&conn, "first@example.com");
    let second_owner = owner_for(&conn, "second@example.com");
    let mut store = TaskStore::try_new(&conn).unwrap();

    let (_, first_feed) = store.subscribe(first_owner).unwrap();
    first_feed.try_recv().unwrap();

    store.add_task(second_owner, "not yours").unwrap();
    assert!(matches!(first_feed.try_recv(), Err(TryRecvError::Empty)));

    store.add_task(first_owner, "yours").unwrap();
    let snapshot = first_feed.try_recv().unwrap();
    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.tasks[0].task, "yours");
}

#[test]
fn unsubscribe_stops_delivery_and_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let owner = owner_for(&conn, "user@example.com");
    let mut store = TaskStore::try_new(&conn).unwrap();

    let (id, feed) = store.subscribe(owner).unwrap();
    feed.try_recv().unwrap();
    assert_eq!(store.active_subscriptions(), 1);

    store.unsubscribe(id);
    assert_eq!(store.active_subscriptions(), 0);
    store.unsubscribe(id);

    store.add_task(owner, "Buy milk").unwrap();
    assert!(matches!(feed.try_recv(), Err(TryRecvError::Disconnected)));
}

#[test]
fn dropped_receivers_are_pruned_on_the_next_delivery() {
    let conn = open_db_in_memory().unwrap();
    let owner = owner_for(&conn, "user@example.com");
    let mut store = TaskStore::try_new(&conn).unwrap();

    let (_, feed) = store.subscribe(owner).unwrap();
    drop(feed);
    assert_eq!(store.active_subscriptions(), 1);

    store.add_task(owner, "Buy milk").unwrap();
    assert_eq!(store.active_subscriptions(), 0);
}

#[test]
fn multiple_subscribers_for_one_owner_all_receive_snapshots() {
    let conn = open_db_in_memory().unwrap();
    let owner = owner_for(&conn, "user@example.com");
    let mut store = TaskStore::try_new(&conn).unwrap();

    let (_, first) = store.subscribe(owner).unwrap();
    let (_, second) = store.subscribe(owner).unwrap();
    first.try_recv().unwrap();
    second.try_recv().unwrap();

    store.add_task(owner, "Buy milk").unwrap();
    assert_eq!(first.try_recv().unwrap().tasks.len(), 1);
    assert_eq!(second.try_recv().unwrap().tasks.len(), 1);
}
