//! Cursor-based pagination over a record store
//!
//! The paginator turns an opaque cursor into a stable, ordered, bounded
//! slice of records. It fetches one probe record beyond the requested
//! size to decide whether a next page exists, so it never needs a count
//! query and never walks the dataset by offset.

use crate::core::entity::Record;
use crate::core::error::{ApiError, PageError};
use crate::core::page::{Cursor, Page, PageRequest};
use crate::storage::{Filter, RecordStore, Sort, StoreError};

/// Fetch one page of records starting strictly after `cursor`.
///
/// Guarantees, for a fixed filter and ordering: sequential calls with each
/// returned `cursor_id` yield every matching record exactly once, in
/// order, provided the anchor record is not deleted between calls. If the
/// anchor vanished the store reports it and the caller gets
/// [`PageError::UnresolvableCursor`]; clients restart from the first page.
pub async fn paginate<T: Record>(
    store: &dyn RecordStore<T>,
    request: PageRequest,
    cursor: Option<Cursor>,
    filter: &Filter,
    sort: &Sort,
) -> Result<Page<T>, ApiError> {
    let size = request.size();
    tracing::debug!(
        record_type = T::record_type(),
        page_size = size,
        cursor = cursor.map(|c| c.to_string()),
        "page query"
    );

    // One extra probe record decides whether a next page exists.
    let mut rows = store
        .fetch_after(cursor.map(|c| c.anchor()), size + 1, filter, sort)
        .await
        .map_err(|e| match e {
            StoreError::AnchorNotFound { id } => ApiError::Page(PageError::UnresolvableCursor {
                cursor: id.to_string(),
            }),
            other => ApiError::Store(other),
        })?;

    if rows.len() > size {
        rows.truncate(size);
        let next = rows
            .last()
            .map(|record| Cursor::from(record.id()))
            .ok_or_else(|| ApiError::Internal("probe returned rows for empty page".to_string()))?;
        Ok(Page::new(rows, Some(next)))
    } else {
        Ok(Page::last(rows))
    }
}
