//! Core abstractions: records, fields, errors, pagination and sessions

pub mod entity;
pub mod error;
pub mod field;
pub mod page;
pub mod paginator;
pub mod session;
pub mod validation;

pub use entity::Record;
pub use error::{ApiError, ApiResult, EntityError, PageError, SessionError, ValidationError};
pub use field::FieldValue;
pub use page::{Cursor, Page, PageRequest};
pub use paginator::paginate;
pub use session::{Session, SessionResolver, SessionStore};
