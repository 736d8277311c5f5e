use std::fmt;

// === SyncError ===

/// Errors surfaced by the bookmark synchronization store and the
/// pre-submission validation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A mutation was attempted with no authenticated identity.
    AuthenticationRequired,
    /// Title or URL was empty after trimming.
    MissingFields,
    /// The URL did not parse as an absolute URL.
    InvalidUrl(String),
    /// The remote store reported a failure.
    DataAccess(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::AuthenticationRequired => write!(f, "User not authenticated"),
            SyncError::MissingFields => write!(f, "Please fill in all fields"),
            SyncError::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
            SyncError::DataAccess(msg) => write!(f, "Data access error: {}", msg),
        }
    }
}

impl std::error::Error for SyncError {}

// === StoreError ===

/// Errors reported by a remote store client implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or the subscription channel failed.
    Connection(String),
    /// The store rejected or failed to execute the operation.
    Query(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Connection(msg) => write!(f, "Store connection error: {}", msg),
            StoreError::Query(msg) => write!(f, "Store query error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
