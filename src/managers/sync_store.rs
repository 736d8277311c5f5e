//! Bookmark Synchronization Store.
//!
//! Maintains a client-local, eventually-consistent mirror of the remote
//! bookmark table for one identity: initial bulk load, live change feed,
//! and the create/delete entry points. Mutations go to the remote store
//! only — local state is updated solely by the change feed, which is the
//! single source of truth.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::managers::collection::BookmarkCollection;
use crate::services::remote_store::{ChangeFeed, RemoteStoreClient};
use crate::services::validation::validate_submission;
use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::SyncError;
use crate::types::event::RowFilter;
use crate::types::identity::Identity;

/// Lifecycle state of one identity session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No identity; collection is empty and no subscription is held.
    Idle,
    /// Identity present, initial bulk load in flight.
    Loading,
    /// Collection populated (possibly empty after a failed load); live
    /// events are being applied as they arrive.
    Synced,
}

struct SyncInner {
    state: SyncState,
    identity: Option<Identity>,
    collection: BookmarkCollection,
    /// Bumped on every identity transition. Async results carrying a stale
    /// epoch are discarded instead of being applied to the new session.
    epoch: u64,
    pump: Option<JoinHandle<()>>,
}

/// The synchronization store. Cheap to share behind an `Arc`; all state
/// lives in an internal mutex held only for synchronous sections.
pub struct BookmarkSyncStore {
    remote: Arc<dyn RemoteStoreClient>,
    inner: Arc<Mutex<SyncInner>>,
}

impl BookmarkSyncStore {
    pub fn new(remote: Arc<dyn RemoteStoreClient>) -> Self {
        Self {
            remote,
            inner: Arc::new(Mutex::new(SyncInner {
                state: SyncState::Idle,
                identity: None,
                collection: BookmarkCollection::new(),
                epoch: 0,
                pump: None,
            })),
        }
    }

    /// Transitions the store to a new identity (or to none).
    ///
    /// Tears down the previous session first: the pump task is aborted,
    /// which drops the change feed and releases the subscription, and the
    /// collection is cleared. With an identity present the store then loads
    /// the identity's rows and subscribes to its change feed. A load or
    /// subscription that completes after a further identity change is
    /// discarded.
    pub async fn set_identity(&self, identity: Option<Identity>) {
        let (owner, epoch) = {
            let mut inner = self.inner.lock().unwrap();
            Self::teardown(&mut inner);
            let identity = match identity {
                Some(identity) => identity,
                None => return,
            };
            debug!(user = %identity.id, "starting bookmark sync session");
            let owner = identity.id.clone();
            inner.identity = Some(identity);
            inner.state = SyncState::Loading;
            (owner, inner.epoch)
        };

        let loaded = self.remote.select(&RowFilter::Owner(owner.clone())).await;
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.epoch != epoch {
                // Identity moved on while the load was in flight.
                return;
            }
            match loaded {
                Ok(rows) => {
                    debug!(count = rows.len(), "loaded bookmarks");
                    inner.collection = BookmarkCollection::from_records(rows);
                }
                Err(e) => {
                    // A failed load degrades to an empty collection; the
                    // session stays interactive and can be retried by
                    // signing in again.
                    error!(error = %e, "failed to load bookmarks");
                    inner.collection.clear();
                }
            }
            inner.state = SyncState::Synced;
        }

        match self.remote.subscribe_changes(&RowFilter::Owner(owner)).await {
            Ok(feed) => {
                let mut inner = self.inner.lock().unwrap();
                if inner.epoch != epoch {
                    // Dropping the feed releases the subscription.
                    return;
                }
                inner.pump = Some(Self::spawn_pump(Arc::clone(&self.inner), feed, epoch));
            }
            Err(e) => error!(error = %e, "failed to subscribe to bookmark changes"),
        }
    }

    /// Binds the store to a session provider's identity channel.
    ///
    /// The spawned task forwards the current identity immediately and then
    /// every subsequent sign-in/sign-out into `set_identity`; when the
    /// provider goes away the session is torn down.
    pub fn watch_session(
        self: &Arc<Self>,
        mut identities: watch::Receiver<Option<Identity>>,
    ) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                let current = identities.borrow_and_update().clone();
                store.set_identity(current).await;
                if identities.changed().await.is_err() {
                    store.set_identity(None).await;
                    break;
                }
            }
        })
    }

    /// Issues a remote insert for the current identity.
    ///
    /// Local state is not touched here: the insert is reflected by the
    /// subsequent event on the change feed. Callers are responsible for
    /// validating input first (see `submit_bookmark`).
    pub async fn add_bookmark(&self, title: &str, url: &str) -> Result<(), SyncError> {
        let identity = self
            .inner
            .lock()
            .unwrap()
            .identity
            .clone()
            .ok_or(SyncError::AuthenticationRequired)?;

        self.remote
            .insert(NewBookmark {
                user_id: identity.id,
                title: title.to_string(),
                url: url.to_string(),
            })
            .await
            .map(|_| ())
            .map_err(|e| {
                error!(error = %e, "failed to add bookmark");
                SyncError::DataAccess(e.to_string())
            })
    }

    /// Validated submission path: rejects empty fields and malformed URLs
    /// without contacting the remote store, then delegates to
    /// `add_bookmark`.
    pub async fn submit_bookmark(&self, title: &str, url: &str) -> Result<(), SyncError> {
        validate_submission(title, url)?;
        self.add_bookmark(title, url).await
    }

    /// Issues a remote delete by id.
    ///
    /// Ownership is not checked locally; the remote store's owner-scoped
    /// access policy is the authority. Removal from the local collection
    /// arrives via the change feed.
    pub async fn delete_bookmark(&self, id: &str) -> Result<(), SyncError> {
        self.remote
            .delete(&RowFilter::Id(id.to_string()))
            .await
            .map_err(|e| {
                error!(error = %e, "failed to delete bookmark");
                SyncError::DataAccess(e.to_string())
            })
    }

    /// Snapshot of the collection, newest first.
    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.inner.lock().unwrap().collection.records().to_vec()
    }

    pub fn state(&self) -> SyncState {
        self.inner.lock().unwrap().state
    }

    pub fn is_loading(&self) -> bool {
        self.state() == SyncState::Loading
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.lock().unwrap().identity.clone()
    }

    fn spawn_pump(
        inner: Arc<Mutex<SyncInner>>,
        mut feed: ChangeFeed,
        epoch: u64,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = feed.recv().await {
                let mut guard = inner.lock().unwrap();
                if guard.epoch != epoch {
                    break;
                }
                guard.collection.apply(&event);
            }
        })
    }

    fn teardown(inner: &mut SyncInner) {
        inner.epoch = inner.epoch.wrapping_add(1);
        if let Some(pump) = inner.pump.take() {
            // Aborting drops the pump's change feed, which releases the
            // subscription at the store.
            pump.abort();
        }
        inner.collection.clear();
        inner.identity = None;
        inner.state = SyncState::Idle;
    }
}

impl Drop for BookmarkSyncStore {
    fn drop(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        Self::teardown(&mut inner);
    }
}
