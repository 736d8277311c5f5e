use serde::{Deserialize, Serialize};

use crate::types::bookmark::Bookmark;

/// A single change delivered on the live feed.
///
/// Delete events carry the old row as the remote store last saw it; the
/// merge policy only consults its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeEvent {
    Insert(Bookmark),
    Update(Bookmark),
    Delete(Bookmark),
}

impl ChangeEvent {
    /// The row the event refers to.
    pub fn record(&self) -> &Bookmark {
        match self {
            ChangeEvent::Insert(b) | ChangeEvent::Update(b) | ChangeEvent::Delete(b) => b,
        }
    }
}

/// Row filter for selects, deletes, and subscriptions.
///
/// These are the only two filters the client ever needs: owner scoping for
/// reads and the feed, id scoping for deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFilter {
    Owner(String),
    Id(String),
}

impl RowFilter {
    /// Whether a row matches this filter.
    pub fn matches(&self, row: &Bookmark) -> bool {
        match self {
            RowFilter::Owner(owner) => row.user_id == *owner,
            RowFilter::Id(id) => row.id == *id,
        }
    }
}
