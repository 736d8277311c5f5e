//! marksync — a real-time personal bookmark sync client.
//!
//! Keeps an in-memory mirror of one user's bookmarks consistent with a
//! remote authoritative store through an initial bulk load and a push-based
//! change feed. The presentation layer consumes `BookmarkSyncStore`; the
//! authentication provider and the remote backend sit behind the
//! `SessionProvider` and `RemoteStoreClient` traits.

pub mod managers;
pub mod services;
pub mod types;
