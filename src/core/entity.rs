//! Record trait defining the core abstraction for all stored types

use crate::core::field::FieldValue;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for all records in the system.
///
/// Every record has:
/// - id: Unique identifier (primary key, also the pagination tie-breaker)
/// - created_at: Creation timestamp
/// - deleted_at: Soft deletion timestamp (optional)
///
/// Field access for filtering and sorting goes through [`field_value`],
/// so stores stay generic over the concrete record type.
///
/// [`field_value`]: Record::field_value
pub trait Record: Clone + Send + Sync + 'static {
    /// The record type name (e.g., "post", "post_comment")
    fn record_type() -> &'static str;

    /// Get the unique identifier for this record
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the soft-deletion timestamp, if any.
    ///
    /// Records that never soft-delete keep the default.
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Get the value of a specific field by name.
    ///
    /// Every record answers `"id"`, `"created_at"` and `"deleted"`; the
    /// rest is type-specific. Unknown fields return None and never match
    /// a filter.
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Check if the record has been soft-deleted
    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct TestRecord {
        id: Uuid,
        created_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    }

    impl Record for TestRecord {
        fn record_type() -> &'static str {
            "test_record"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }

        fn deleted_at(&self) -> Option<DateTime<Utc>> {
            self.deleted_at
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "id" => Some(self.id.into()),
                "created_at" => Some(self.created_at.into()),
                "deleted" => Some(self.is_deleted().into()),
                _ => None,
            }
        }
    }

    #[test]
    fn test_is_deleted() {
        let now = Utc::now();
        let mut record = TestRecord {
            id: Uuid::new_v4(),
            created_at: now,
            deleted_at: None,
        };

        assert!(!record.is_deleted());
        assert_eq!(record.field_value("deleted"), Some(FieldValue::Boolean(false)));

        record.deleted_at = Some(now);
        assert!(record.is_deleted());
        assert_eq!(record.field_value("deleted"), Some(FieldValue::Boolean(true)));
    }

    #[test]
    fn test_unknown_field_is_none() {
        let record = TestRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            deleted_at: None,
        };
        assert_eq!(record.field_value("nope"), None);
    }
}
