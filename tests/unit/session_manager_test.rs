//! Unit tests for the session manager and its provider contract.

use marksync::managers::session_manager::{SessionManager, SessionProvider};
use marksync::types::identity::Identity;

#[test]
fn test_starts_signed_out() {
    let session = SessionManager::new();
    assert!(session.current_identity().is_none());
    assert!(!session.is_loading());
}

#[test]
fn test_sign_in_and_out() {
    let session = SessionManager::new();
    session.sign_in(Identity::with_email("u-1", "alice@example.com"));

    let identity = session.current_identity().unwrap();
    assert_eq!(identity.id, "u-1");
    assert_eq!(identity.email.as_deref(), Some("alice@example.com"));

    session.sign_out();
    assert!(session.current_identity().is_none());
}

#[test]
fn test_sign_in_clears_loading() {
    let session = SessionManager::new();
    session.set_loading(true);
    assert!(session.is_loading());

    session.sign_in(Identity::new("u-1"));
    assert!(!session.is_loading());
}

/// Watchers observe every sign-in and sign-out.
#[tokio::test]
async fn test_watchers_are_notified() {
    let session = SessionManager::new();
    let mut rx = session.watch_identity();
    assert!(rx.borrow_and_update().is_none());

    session.sign_in(Identity::new("u-1"));
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().as_ref().unwrap().id, "u-1");

    session.sign_out();
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_none());
}
