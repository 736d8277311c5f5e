//! Session Provider contract and reference implementation.
//!
//! The authentication provider itself (tokens, refresh, persistence) is an
//! external collaborator; the sync store only needs the current identity and
//! a way to hear about changes to it.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::types::identity::Identity;

/// Trait defining what the sync layer consumes from the auth session.
pub trait SessionProvider: Send + Sync {
    /// The currently authenticated identity, if any.
    fn current_identity(&self) -> Option<Identity>;
    /// Whether the provider is still resolving the initial session.
    fn is_loading(&self) -> bool;
    /// A watch channel that yields the identity on every sign-in/sign-out.
    fn watch_identity(&self) -> watch::Receiver<Option<Identity>>;
}

/// In-process session manager backed by a watch channel.
pub struct SessionManager {
    identity: watch::Sender<Option<Identity>>,
    loading: AtomicBool,
}

impl SessionManager {
    pub fn new() -> Self {
        let (identity, _) = watch::channel(None);
        Self {
            identity,
            loading: AtomicBool::new(false),
        }
    }

    /// Marks the initial session as resolving or resolved.
    pub fn set_loading(&self, loading: bool) {
        self.loading.store(loading, Ordering::SeqCst);
    }

    /// Signs an identity in, notifying all watchers.
    pub fn sign_in(&self, identity: Identity) {
        self.loading.store(false, Ordering::SeqCst);
        self.identity.send_replace(Some(identity));
    }

    /// Signs the current identity out, notifying all watchers.
    pub fn sign_out(&self) {
        self.identity.send_replace(None);
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProvider for SessionManager {
    fn current_identity(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    fn watch_identity(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.subscribe()
    }
}
