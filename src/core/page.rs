//! Cursor, page-size request and page wire shape

use crate::core::error::PageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque position anchor for cursor pagination.
///
/// A cursor identifies the last record returned in the previous page. It
/// is not a page number or offset: inserts and deletes elsewhere in the
/// dataset do not shift already-seen results. Callers treat it as an
/// opaque token; the wrapped id format is a storage-layer detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(Uuid);

impl Cursor {
    /// Parse a cursor from its wire form. A token that does not parse can
    /// anchor nothing, so the caller reports it as unresolvable.
    pub fn parse(token: &str) -> Result<Self, PageError> {
        Uuid::parse_str(token)
            .map(Cursor)
            .map_err(|_| PageError::UnresolvableCursor {
                cursor: token.to_string(),
            })
    }

    /// The anchor record's id
    pub fn anchor(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for Cursor {
    fn from(id: Uuid) -> Self {
        Cursor(id)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated page-size request.
///
/// Construction is the only place page sizes are checked, so a request
/// that fails validation never reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    size: usize,
}

impl PageRequest {
    /// Validate a requested page size.
    ///
    /// Non-positive sizes are client errors. Sizes beyond `max` are
    /// clamped rather than rejected, so one oversized request cannot pull
    /// an unbounded slice out of the store.
    pub fn from_take(take: i64, max: usize) -> Result<Self, PageError> {
        if take <= 0 {
            return Err(PageError::InvalidSize { got: take });
        }
        let size = usize::try_from(take)
            .unwrap_or(usize::MAX)
            .min(max.max(1));
        Ok(Self { size })
    }

    /// A page request of exactly `size`, for server-chosen page sizes
    pub fn of(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// One page of records plus the cursor for the next page.
///
/// Invariant: `count == data.len()`, and `cursor_id` is `None` iff this is
/// the last page.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub count: usize,
    pub cursor_id: Option<Cursor>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, cursor_id: Option<Cursor>) -> Self {
        Self {
            count: data.len(),
            data,
            cursor_id,
        }
    }

    /// A terminal page: everything fit, no next cursor
    pub fn last(data: Vec<T>) -> Self {
        Self::new(data, None)
    }

    /// Map the page payload while keeping count and cursor intact
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            data: self.data.into_iter().map(f).collect(),
            cursor_id: self.cursor_id,
        }
    }
}
