//! Storage boundary: query model and store traits
//!
//! The API core never talks to a concrete backend. Handlers and the
//! paginator work against the traits defined here; `in_memory` provides
//! the reference implementations.

pub mod in_memory;

pub use in_memory::{InMemoryObjectStore, InMemorySessionStore, InMemoryStore};

use crate::core::entity::Record;
use crate::core::field::FieldValue;
use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

/// Errors surfaced by storage backends
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The pagination anchor id is not in the matching set (deleted, or
    /// never existed)
    #[error("anchor record '{id}' not found")]
    AnchorNotFound { id: Uuid },

    /// Record targeted by an update no longer exists
    #[error("record '{id}' not found")]
    RecordNotFound { id: Uuid },

    /// Backend failure (poisoned lock, connection loss, ...)
    #[error("storage backend error: {message}")]
    Backend { message: String },
}

/// A single filter predicate evaluated against [`Record::field_value`]
#[derive(Debug, Clone)]
pub enum Condition {
    /// Field equals the given value
    Eq(&'static str, FieldValue),

    /// List-valued field contains the given element
    Has(&'static str, String),
}

/// A conjunction of filter predicates.
///
/// An empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`
    pub fn eq(mut self, field: &'static str, value: impl Into<FieldValue>) -> Self {
        self.conditions.push(Condition::Eq(field, value.into()));
        self
    }

    /// Require the list field to contain `element`
    pub fn has(mut self, field: &'static str, element: impl Into<String>) -> Self {
        self.conditions.push(Condition::Has(field, element.into()));
        self
    }

    /// Evaluate the conjunction against a record
    pub fn matches<T: Record>(&self, record: &T) -> bool {
        self.conditions.iter().all(|condition| match condition {
            Condition::Eq(field, value) => {
                record.field_value(field).as_ref() == Some(value)
            }
            Condition::Has(field, element) => record
                .field_value(field)
                .is_some_and(|v| v.contains(element)),
        })
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Business ordering for listings.
///
/// Stores make this a total order by appending an ascending primary-key
/// tie-break beneath the named field; without it, records with equal sort
/// keys would make pagination unstable.
#[derive(Debug, Clone, Copy)]
pub struct Sort {
    pub field: &'static str,
    pub direction: Direction,
}

impl Sort {
    pub fn asc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

/// Store trait for a single record type.
///
/// `fetch_after` is the seek operation cursor pagination depends on: it
/// returns up to `limit` records strictly after the anchor's position in
/// `(sort key, id)` order, never an offset skip.
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Insert a new record
    async fn insert(&self, record: T) -> Result<T, StoreError>;

    /// Get a record by id
    async fn get(&self, id: &Uuid) -> Result<Option<T>, StoreError>;

    /// Replace an existing record
    async fn update(&self, id: &Uuid, record: T) -> Result<T, StoreError>;

    /// Hard-delete a record. Returns whether it existed.
    async fn delete(&self, id: &Uuid) -> Result<bool, StoreError>;

    /// List all records matching the filter, in unspecified order
    async fn find(&self, filter: &Filter) -> Result<Vec<T>, StoreError>;

    /// Fetch up to `limit` matching records strictly after `anchor` in the
    /// given order.
    ///
    /// `anchor == None` starts from the beginning. An anchor outside the
    /// matching set yields [`StoreError::AnchorNotFound`].
    async fn fetch_after(
        &self,
        anchor: Option<Uuid>,
        limit: usize,
        filter: &Filter,
        sort: &Sort,
    ) -> Result<Vec<T>, StoreError>;

    /// Word-match search on a string field.
    ///
    /// Every whitespace-separated word of `query` must appear in the field
    /// value (case-insensitive). Soft-deleted records never match and do
    /// not count against `limit`. Results come back in ascending creation
    /// order, capped at `limit`.
    async fn search(
        &self,
        field: &'static str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<T>, StoreError>;
}

/// Store trait for uploaded media blobs
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a blob under `path` and return its public URL
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<String, StoreError>;
}
