//! Remote Store Client contract.
//!
//! The remote backend (query, insert, delete, live change feed) sits behind
//! `RemoteStoreClient` so the sync store can be exercised against any
//! implementation — in production a managed database client, in tests the
//! in-memory store.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::StoreError;
use crate::types::event::{ChangeEvent, RowFilter};

/// Trait defining the remote store operations the sync client needs.
///
/// Row-level access control (owner scoping of mutations) is the
/// implementation's responsibility; callers only supply filters.
#[async_trait]
pub trait RemoteStoreClient: Send + Sync {
    /// Fetches all rows matching `filter`, ordered by `created_at`
    /// descending.
    async fn select(&self, filter: &RowFilter) -> Result<Vec<Bookmark>, StoreError>;

    /// Inserts a new row. The store assigns the id and creation timestamp
    /// and returns the stored row.
    async fn insert(&self, record: NewBookmark) -> Result<Bookmark, StoreError>;

    /// Deletes rows matching `filter`. Deleting nothing is not an error.
    async fn delete(&self, filter: &RowFilter) -> Result<(), StoreError>;

    /// Establishes a live change feed for rows matching `filter`.
    async fn subscribe_changes(&self, filter: &RowFilter) -> Result<ChangeFeed, StoreError>;
}

/// A live subscription handle.
///
/// Yields change events in delivery order. The subscription is released
/// exactly once: either through `unsubscribe` or when the handle is dropped,
/// so teardown happens on every exit path.
pub struct ChangeFeed {
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl ChangeFeed {
    /// Builds a feed from a receiver and a teardown hook that deregisters
    /// the subscription at the store.
    pub fn new(
        rx: mpsc::UnboundedReceiver<ChangeEvent>,
        teardown: Box<dyn FnOnce() + Send>,
    ) -> Self {
        Self {
            rx,
            teardown: Some(teardown),
        }
    }

    /// Waits for the next event. Returns `None` once the store side closes
    /// the channel.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }

    /// Explicitly releases the subscription.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for ChangeFeed {
    fn drop(&mut self) {
        self.release();
    }
}
