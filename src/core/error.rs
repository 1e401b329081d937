//! Typed error handling for the API
//!
//! This module provides the error hierarchy surfaced by handlers and the
//! two core components. Each category maps to an HTTP status and a stable
//! error code, so clients can distinguish "your input was bad" from "we
//! failed internally".
//!
//! # Error Categories
//!
//! - [`SessionError`]: session resolution failures (one collapsed case)
//! - [`PageError`]: pagination request failures
//! - [`EntityError`]: record lookup/conflict failures
//! - [`ValidationError`]: request payload validation failures
//! - [`UploadError`]: media upload failures
//! - `Store`: storage backend failures, surfaced opaquely

use crate::storage::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for the API
#[derive(Debug)]
pub enum ApiError {
    /// Session resolution errors
    Session(SessionError),

    /// Pagination errors
    Page(PageError),

    /// Record-related errors
    Entity(EntityError),

    /// Request payload validation errors
    Validation(ValidationError),

    /// Media upload errors
    Upload(UploadError),

    /// Storage backend errors (opaque to clients)
    Store(StoreError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Session(e) => write!(f, "{}", e),
            ApiError::Page(e) => write!(f, "{}", e),
            ApiError::Entity(e) => write!(f, "{}", e),
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::Upload(e) => write!(f, "{}", e),
            // Store details stay in the logs, not in the response body
            ApiError::Store(_) => write!(f, "Internal storage error"),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Session(e) => Some(e),
            ApiError::Page(e) => Some(e),
            ApiError::Entity(e) => Some(e),
            ApiError::Validation(e) => Some(e),
            ApiError::Upload(e) => Some(e),
            ApiError::Store(e) => Some(e),
            ApiError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Session(e) => e.status_code(),
            ApiError::Page(e) => e.status_code(),
            ApiError::Entity(e) => e.status_code(),
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Upload(e) => e.status_code(),
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Session(e) => e.error_code(),
            ApiError::Page(e) => e.error_code(),
            ApiError::Entity(e) => e.error_code(),
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Upload(e) => e.error_code(),
            ApiError::Store(_) => "STORAGE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store(e) = &self {
            tracing::error!(error = %e, "storage failure surfaced to client");
        }
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Session Errors
// =============================================================================

/// Errors from session resolution.
///
/// Absent, malformed, unknown and expired tokens all collapse into the
/// single `Invalid` case so the response leaks nothing about which one
/// occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    Invalid,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Invalid => {
                write!(f, "Invalid session id or session has expired.")
            }
        }
    }
}

impl std::error::Error for SessionError {}

impl SessionError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::FORBIDDEN
    }

    pub fn error_code(&self) -> &'static str {
        "INVALID_SESSION"
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::Session(err)
    }
}

// =============================================================================
// Page Errors
// =============================================================================

/// Errors from pagination requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// Requested page size was zero or negative
    InvalidSize { got: i64 },

    /// The cursor could not be anchored: the token is malformed, or the
    /// record it pointed at no longer exists
    UnresolvableCursor { cursor: String },
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::InvalidSize { got } => {
                write!(f, "Page size must be positive (got {})", got)
            }
            PageError::UnresolvableCursor { cursor } => {
                write!(
                    f,
                    "Cursor '{}' no longer resolves; restart from the first page",
                    cursor
                )
            }
        }
    }
}

impl std::error::Error for PageError {}

impl PageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PageError::InvalidSize { .. } => StatusCode::BAD_REQUEST,
            PageError::UnresolvableCursor { .. } => StatusCode::GONE,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PageError::InvalidSize { .. } => "INVALID_PAGE_REQUEST",
            PageError::UnresolvableCursor { .. } => "UNRESOLVABLE_CURSOR",
        }
    }
}

impl From<PageError> for ApiError {
    fn from(err: PageError) -> Self {
        ApiError::Page(err)
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to record lookups
#[derive(Debug)]
pub enum EntityError {
    /// Record was not found
    NotFound { record_type: String },

    /// Record already exists (conflict)
    Conflict { record_type: String, message: String },
}

impl EntityError {
    pub fn not_found(record_type: &str) -> Self {
        EntityError::NotFound {
            record_type: record_type.to_string(),
        }
    }
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { record_type } => {
                write!(f, "{} not found", record_type)
            }
            EntityError::Conflict {
                record_type,
                message,
            } => {
                write!(f, "{} conflict: {}", record_type, message)
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::Conflict { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "NOT_FOUND",
            EntityError::Conflict { .. } => "CONFLICT",
        }
    }
}

impl From<EntityError> for ApiError {
    fn from(err: EntityError) -> Self {
        ApiError::Entity(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to request payload validation
#[derive(Debug)]
pub enum ValidationError {
    /// Single field validation error
    Field { field: String, message: String },

    /// Free-form validation failure
    Message(String),
}

impl ValidationError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ValidationError::Field {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Field { field, message } => {
                write!(f, "Validation error for field '{}': {}", field, message)
            }
            ValidationError::Message(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errs: validator::ValidationErrors) -> Self {
        ApiError::Validation(ValidationError::Message(errs.to_string()))
    }
}

// =============================================================================
// Upload Errors
// =============================================================================

/// Errors related to media uploads
#[derive(Debug)]
pub enum UploadError {
    /// Part carried no filename
    MissingFilename,

    /// File exceeds the configured size limit
    TooLarge { filename: String, max_bytes: u64 },

    /// Content type is not accepted
    UnsupportedType { filename: String },

    /// Object storage could not be reached
    StorageUnreachable,

    /// Malformed multipart body
    InvalidBody { message: String },
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::MissingFilename => write!(f, "No filename provided."),
            UploadError::TooLarge {
                filename,
                max_bytes,
            } => {
                write!(
                    f,
                    "File '{}' exceeds the maximum allowed size of {}.",
                    filename, max_bytes
                )
            }
            UploadError::UnsupportedType { filename } => {
                write!(f, "Invalid file type for '{}'.", filename)
            }
            UploadError::StorageUnreachable => {
                write!(
                    f,
                    "Post could not be uploaded as object storage is not reachable."
                )
            }
            UploadError::InvalidBody { message } => {
                write!(f, "Invalid upload body: {}", message)
            }
        }
    }
}

impl std::error::Error for UploadError {}

impl UploadError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::MissingFilename => StatusCode::BAD_REQUEST,
            UploadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::UnsupportedType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            UploadError::StorageUnreachable => StatusCode::SERVICE_UNAVAILABLE,
            UploadError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            UploadError::MissingFilename => "UPLOAD_MISSING_FILENAME",
            UploadError::TooLarge { .. } => "UPLOAD_TOO_LARGE",
            UploadError::UnsupportedType { .. } => "UPLOAD_UNSUPPORTED_TYPE",
            UploadError::StorageUnreachable => "UPLOAD_STORAGE_UNREACHABLE",
            UploadError::InvalidBody { .. } => "UPLOAD_INVALID_BODY",
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        ApiError::Upload(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

/// A specialized Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
