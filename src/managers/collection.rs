//! The local bookmark mirror and its event merge policy.
//!
//! `BookmarkCollection` holds the rows for one identity in non-increasing
//! `created_at` order and applies change events idempotently: replaying an
//! event leaves the collection exactly as applying it once did.

use crate::types::bookmark::Bookmark;
use crate::types::event::ChangeEvent;

/// Ordered, id-keyed collection of one identity's bookmarks.
#[derive(Debug, Clone, Default)]
pub struct BookmarkCollection {
    items: Vec<Bookmark>,
}

impl BookmarkCollection {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Builds a collection from an initial bulk load, sorting into
    /// descending creation-timestamp order.
    pub fn from_records(mut records: Vec<Bookmark>) -> Self {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { items: records }
    }

    /// Applies one change event.
    ///
    /// - insert: overwrite if the id is already present (treated as an
    ///   update), otherwise insert at the position that keeps descending
    ///   order (newest first among equal timestamps);
    /// - update: overwrite if present, otherwise a no-op;
    /// - delete: remove if present, otherwise a no-op.
    ///
    /// An overwrite keeps the row at its timestamp-ordered position, so the
    /// ordering invariant holds even for an event carrying an unexpected
    /// `created_at`.
    pub fn apply(&mut self, event: &ChangeEvent) {
        match event {
            ChangeEvent::Insert(record) => {
                self.items.retain(|b| b.id != record.id);
                self.insert_ordered(record.clone());
            }
            ChangeEvent::Update(record) => {
                if self.contains(&record.id) {
                    self.items.retain(|b| b.id != record.id);
                    self.insert_ordered(record.clone());
                }
            }
            ChangeEvent::Delete(record) => {
                self.items.retain(|b| b.id != record.id);
            }
        }
    }

    fn insert_ordered(&mut self, record: Bookmark) {
        let at = self
            .items
            .partition_point(|b| b.created_at > record.created_at);
        self.items.insert(at, record);
    }

    /// The rows, newest first.
    pub fn records(&self) -> &[Bookmark] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Bookmark> {
        self.items.iter().find(|b| b.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
