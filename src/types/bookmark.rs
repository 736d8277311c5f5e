use serde::{Deserialize, Serialize};

/// A saved bookmark row as held by the remote store.
///
/// `id` and `created_at` are server-assigned: the id is an opaque unique
/// string and `created_at` is a Unix-epoch millisecond timestamp that is
/// monotonically non-decreasing per owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub url: String,
    pub created_at: i64,
}

/// Insert payload for a new bookmark. The server assigns `id` and
/// `created_at` on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBookmark {
    pub user_id: String,
    pub title: String,
    pub url: String,
}
