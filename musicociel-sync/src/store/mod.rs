//! Revisioned document stores
//!
//! Every document carries a revision token. A write must name the revision
//! it was based on; a write based on anything but the current revision is
//! rejected with [`StoreError::Conflict`]. Deletion is a write too (a
//! tombstone), so a record changed since it was read cannot be deleted.

mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::StoreError;
use crate::record::StoreRecord;
use serde_json::Value;

/// A live document as returned by [`DocumentStore::scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRef {
    pub id: String,
    pub rev: String,
}

/// A document as returned by [`DocumentStore::get`], tombstones included.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub rev: String,
    pub deleted: bool,
    pub body: Value,
}

pub trait DocumentStore {
    /// Writes `record` and returns its new revision.
    ///
    /// - no `rev`: creates the document; conflicts if a live one exists
    /// - `rev`: updates (or deletes) the document; conflicts unless `rev` is current
    fn put(&mut self, record: &StoreRecord) -> Result<String, StoreError>;

    fn get(&self, id: &str) -> Result<Option<StoredDocument>, StoreError>;

    /// Live documents with `start <= id <= end`, ordered by id.
    fn scan(&self, start: &str, end: &str) -> Result<Vec<RowRef>, StoreError>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &mut S {
    fn put(&mut self, record: &StoreRecord) -> Result<String, StoreError> {
        (**self).put(record)
    }

    fn get(&self, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        (**self).get(id)
    }

    fn scan(&self, start: &str, end: &str) -> Result<Vec<RowRef>, StoreError> {
        (**self).scan(start, end)
    }
}
