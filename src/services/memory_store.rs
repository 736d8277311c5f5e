//! In-memory remote store.
//!
//! A faithful stand-in for the managed backend: owner-scoped rows with
//! server-assigned ids and timestamps, and a change feed fanned out to
//! owner-filtered subscribers. Used by the test suites and local runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::services::remote_store::{ChangeFeed, RemoteStoreClient};
use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::StoreError;
use crate::types::event::{ChangeEvent, RowFilter};

struct Subscriber {
    filter: RowFilter,
    tx: mpsc::UnboundedSender<ChangeEvent>,
}

struct StoreInner {
    rows: Vec<Bookmark>,
    subscribers: HashMap<u64, Subscriber>,
    next_subscription: u64,
    /// Last assigned creation timestamp per owner, to keep timestamps
    /// monotonically non-decreasing even under rapid inserts.
    last_created: HashMap<String, i64>,
}

/// In-memory implementation of `RemoteStoreClient`.
pub struct InMemoryRemoteStore {
    inner: Arc<Mutex<StoreInner>>,
    fail_selects: AtomicBool,
    fail_mutations: AtomicBool,
    select_delay: Mutex<Option<Duration>>,
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                rows: Vec::new(),
                subscribers: HashMap::new(),
                next_subscription: 0,
                last_created: HashMap::new(),
            })),
            fail_selects: AtomicBool::new(false),
            fail_mutations: AtomicBool::new(false),
            select_delay: Mutex::new(None),
        }
    }

    /// Makes subsequent `select` calls fail with a query error.
    pub fn fail_selects(&self, fail: bool) {
        self.fail_selects.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent `insert`/`delete` calls fail with a query error.
    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    /// Delays `select` responses, for exercising cancellation of in-flight
    /// loads.
    pub fn set_select_delay(&self, delay: Option<Duration>) {
        *self.select_delay.lock().unwrap() = delay;
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().unwrap().subscribers.len()
    }

    /// Total number of stored rows, across all owners.
    pub fn row_count(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }

    /// Edits a row in place and emits an update event, simulating a change
    /// made by another session of the same identity.
    pub fn update_bookmark(
        &self,
        id: &str,
        title: Option<&str>,
        url: Option<&str>,
    ) -> Result<Bookmark, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let row = inner
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::Query(format!("no row with id {}", id)))?;
        if let Some(t) = title {
            row.title = t.to_string();
        }
        if let Some(u) = url {
            row.url = u.to_string();
        }
        let updated = row.clone();
        Self::broadcast(&mut inner, ChangeEvent::Update(updated.clone()));
        Ok(updated)
    }

    /// Inserts a row directly with a caller-chosen timestamp, bypassing the
    /// clock. Events are still fanned out. Intended for test seeding.
    pub fn seed_row(&self, row: Bookmark) {
        let mut inner = self.inner.lock().unwrap();
        let last = inner
            .last_created
            .entry(row.user_id.clone())
            .or_insert(i64::MIN);
        *last = (*last).max(row.created_at);
        inner.rows.push(row.clone());
        Self::broadcast(&mut inner, ChangeEvent::Insert(row));
    }

    fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }

    fn broadcast(inner: &mut StoreInner, event: ChangeEvent) {
        // Drop senders whose feed side has gone away.
        inner.subscribers.retain(|_, sub| {
            if !sub.filter.matches(event.record()) {
                return true;
            }
            sub.tx.send(event.clone()).is_ok()
        });
    }
}

impl Default for InMemoryRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStoreClient for InMemoryRemoteStore {
    async fn select(&self, filter: &RowFilter) -> Result<Vec<Bookmark>, StoreError> {
        let delay = *self.select_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_selects.load(Ordering::SeqCst) {
            return Err(StoreError::Query("select failed".to_string()));
        }

        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<Bookmark> = inner
            .rows
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, record: NewBookmark) -> Result<Bookmark, StoreError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(StoreError::Query("insert failed".to_string()));
        }

        let mut inner = self.inner.lock().unwrap();
        let last = inner
            .last_created
            .entry(record.user_id.clone())
            .or_insert(i64::MIN);
        let created_at = Self::now_millis().max(*last);
        *last = created_at;

        let row = Bookmark {
            id: Uuid::new_v4().to_string(),
            user_id: record.user_id,
            title: record.title,
            url: record.url,
            created_at,
        };
        inner.rows.push(row.clone());
        Self::broadcast(&mut inner, ChangeEvent::Insert(row.clone()));
        Ok(row)
    }

    async fn delete(&self, filter: &RowFilter) -> Result<(), StoreError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(StoreError::Query("delete failed".to_string()));
        }

        let mut inner = self.inner.lock().unwrap();
        let removed: Vec<Bookmark> = inner
            .rows
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        inner.rows.retain(|r| !filter.matches(r));
        for row in removed {
            Self::broadcast(&mut inner, ChangeEvent::Delete(row));
        }
        Ok(())
    }

    async fn subscribe_changes(&self, filter: &RowFilter) -> Result<ChangeFeed, StoreError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut inner = self.inner.lock().unwrap();
            let id = inner.next_subscription;
            inner.next_subscription += 1;
            inner.subscribers.insert(
                id,
                Subscriber {
                    filter: filter.clone(),
                    tx,
                },
            );
            id
        };

        // The teardown hook holds a weak reference so a lingering feed does
        // not keep the store alive.
        let registry: Weak<Mutex<StoreInner>> = Arc::downgrade(&self.inner);
        let teardown = Box::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.lock().unwrap().subscribers.remove(&id);
            }
        });
        Ok(ChangeFeed::new(rx, teardown))
    }
}
