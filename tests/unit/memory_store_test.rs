//! Unit tests for the in-memory remote store.
//!
//! Verifies the backend contract the sync store depends on: owner scoping,
//! server-assigned ids and timestamps, event fan-out, and subscription
//! release.

use marksync::services::memory_store::InMemoryRemoteStore;
use marksync::services::remote_store::RemoteStoreClient;
use marksync::types::bookmark::NewBookmark;
use marksync::types::event::{ChangeEvent, RowFilter};

fn new_bookmark(user: &str, title: &str, url: &str) -> NewBookmark {
    NewBookmark {
        user_id: user.to_string(),
        title: title.to_string(),
        url: url.to_string(),
    }
}

/// Select returns only the requested owner's rows, newest first.
#[tokio::test]
async fn test_select_scopes_by_owner_and_orders_descending() {
    let store = InMemoryRemoteStore::new();
    store
        .insert(new_bookmark("alice", "First", "https://a.com/1"))
        .await
        .unwrap();
    store
        .insert(new_bookmark("bob", "Other", "https://b.com"))
        .await
        .unwrap();
    store
        .insert(new_bookmark("alice", "Second", "https://a.com/2"))
        .await
        .unwrap();

    let rows = store
        .select(&RowFilter::Owner("alice".to_string()))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.user_id == "alice"));
    assert!(rows[0].created_at >= rows[1].created_at);
    assert_eq!(rows[0].title, "Second");
}

/// Insert assigns a unique id and per-owner non-decreasing timestamps.
#[tokio::test]
async fn test_insert_assigns_id_and_monotonic_timestamps() {
    let store = InMemoryRemoteStore::new();
    let first = store
        .insert(new_bookmark("alice", "One", "https://a.com/1"))
        .await
        .unwrap();
    let second = store
        .insert(new_bookmark("alice", "Two", "https://a.com/2"))
        .await
        .unwrap();

    assert!(!first.id.is_empty());
    assert_ne!(first.id, second.id);
    assert!(second.created_at >= first.created_at);
}

/// Delete by id removes the row; deleting a nonexistent id is not an error.
#[tokio::test]
async fn test_delete_by_id() {
    let store = InMemoryRemoteStore::new();
    let row = store
        .insert(new_bookmark("alice", "One", "https://a.com"))
        .await
        .unwrap();

    store.delete(&RowFilter::Id(row.id.clone())).await.unwrap();
    assert_eq!(store.row_count(), 0);

    store.delete(&RowFilter::Id(row.id)).await.unwrap();
    assert_eq!(store.row_count(), 0);
}

/// Subscribers only receive events for rows matching their owner filter.
#[tokio::test]
async fn test_subscription_filters_by_owner() {
    let store = InMemoryRemoteStore::new();
    let mut feed = store
        .subscribe_changes(&RowFilter::Owner("alice".to_string()))
        .await
        .unwrap();

    store
        .insert(new_bookmark("bob", "Not mine", "https://b.com"))
        .await
        .unwrap();
    let mine = store
        .insert(new_bookmark("alice", "Mine", "https://a.com"))
        .await
        .unwrap();

    // The first delivered event must be alice's insert, not bob's.
    match feed.recv().await {
        Some(ChangeEvent::Insert(row)) => assert_eq!(row.id, mine.id),
        other => panic!("expected insert event, got {:?}", other),
    }
}

/// Inserts, updates, and deletes each fan out as the corresponding event
/// kind.
#[tokio::test]
async fn test_event_kinds_delivered_in_order() {
    let store = InMemoryRemoteStore::new();
    let mut feed = store
        .subscribe_changes(&RowFilter::Owner("alice".to_string()))
        .await
        .unwrap();

    let row = store
        .insert(new_bookmark("alice", "One", "https://a.com"))
        .await
        .unwrap();
    store.update_bookmark(&row.id, Some("Renamed"), None).unwrap();
    store.delete(&RowFilter::Id(row.id.clone())).await.unwrap();

    assert!(matches!(feed.recv().await, Some(ChangeEvent::Insert(_))));
    match feed.recv().await {
        Some(ChangeEvent::Update(updated)) => assert_eq!(updated.title, "Renamed"),
        other => panic!("expected update event, got {:?}", other),
    }
    match feed.recv().await {
        Some(ChangeEvent::Delete(deleted)) => assert_eq!(deleted.id, row.id),
        other => panic!("expected delete event, got {:?}", other),
    }
}

/// Dropping the feed handle releases the subscription; unsubscribe does the
/// same explicitly.
#[tokio::test]
async fn test_feed_release_on_drop_and_unsubscribe() {
    let store = InMemoryRemoteStore::new();

    let feed = store
        .subscribe_changes(&RowFilter::Owner("alice".to_string()))
        .await
        .unwrap();
    assert_eq!(store.subscriber_count(), 1);
    drop(feed);
    assert_eq!(store.subscriber_count(), 0);

    let feed = store
        .subscribe_changes(&RowFilter::Owner("alice".to_string()))
        .await
        .unwrap();
    assert_eq!(store.subscriber_count(), 1);
    feed.unsubscribe();
    assert_eq!(store.subscriber_count(), 0);
}

/// Failure injection makes reads and mutations report query errors.
#[tokio::test]
async fn test_failure_injection() {
    let store = InMemoryRemoteStore::new();

    store.fail_selects(true);
    assert!(store
        .select(&RowFilter::Owner("alice".to_string()))
        .await
        .is_err());
    store.fail_selects(false);

    store.fail_mutations(true);
    assert!(store
        .insert(new_bookmark("alice", "One", "https://a.com"))
        .await
        .is_err());
    assert!(store
        .delete(&RowFilter::Id("any".to_string()))
        .await
        .is_err());
    assert_eq!(store.row_count(), 0);
}

/// Updating a nonexistent row reports an error.
#[tokio::test]
async fn test_update_unknown_row_fails() {
    let store = InMemoryRemoteStore::new();
    assert!(store.update_bookmark("ghost", Some("X"), None).is_err());
}
