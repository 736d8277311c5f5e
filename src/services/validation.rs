//! Client-side input validation for bookmark submissions.
//!
//! Advisory only — the remote store's schema and access policy are the
//! actual authority. This just rejects obviously bad input before a
//! round-trip is spent on it.

use url::Url;

use crate::types::errors::SyncError;

/// Validates a bookmark submission.
///
/// Title and URL must be non-empty after trimming, and the URL must parse
/// as an absolute URL.
pub fn validate_submission(title: &str, url: &str) -> Result<(), SyncError> {
    if title.trim().is_empty() || url.trim().is_empty() {
        return Err(SyncError::MissingFields);
    }

    // Url::parse rejects relative references, matching the browser URL
    // constructor the original form used.
    Url::parse(url).map_err(|_| SyncError::InvalidUrl(url.to_string()))?;

    Ok(())
}
