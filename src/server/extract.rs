//! Request extraction: pagination headers and session authorization

use crate::core::error::{ApiError, PageError, SessionError, ValidationError};
use crate::core::page::{Cursor, PageRequest};
use crate::server::AppState;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum::extract::FromRequestParts;
use uuid::Uuid;

/// Header carrying the session token
pub const SESSION_HEADER: &str = "session-id";

/// Pagination headers sent by feed clients.
///
/// `take` is the requested page size, `cursor` the id of the last fetched
/// item. Both travel as request headers, out-of-band of the query string.
#[derive(Debug, Clone, Default)]
pub struct PageHeaders {
    pub take: Option<i64>,
    pub cursor: Option<String>,
}

impl PageHeaders {
    /// Turn raw headers into a validated page request plus parsed cursor.
    ///
    /// Validation happens here, before any store call.
    pub fn page_request(
        &self,
        default_take: i64,
        max_page_size: usize,
    ) -> Result<(PageRequest, Option<Cursor>), ApiError> {
        let take = self.take.unwrap_or(default_take);
        let request = PageRequest::from_take(take, max_page_size)?;
        let cursor = match &self.cursor {
            Some(token) => Some(Cursor::parse(token)?),
            None => None,
        };
        Ok((request, cursor))
    }
}

impl<S> FromRequestParts<S> for PageHeaders
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let take = match parts.headers.get("take") {
            None => None,
            Some(value) => {
                let text = value.to_str().map_err(|_| {
                    ApiError::Validation(ValidationError::field("take", "must be an integer"))
                })?;
                Some(text.parse::<i64>().map_err(|_| {
                    ApiError::Validation(ValidationError::field("take", "must be an integer"))
                })?)
            }
        };

        // a token that is not even a string can anchor nothing
        let cursor = match parts.headers.get("cursor") {
            None => None,
            Some(value) => {
                let text = value.to_str().map_err(|_| {
                    ApiError::Page(PageError::UnresolvableCursor {
                        cursor: String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    })
                })?;
                Some(text.to_string())
            }
        };

        Ok(Self { take, cursor })
    }
}

/// Resolve the request's `session-id` header to a user id.
///
/// A missing header is indistinguishable from a bad token.
pub async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let token = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(SessionError::Invalid)?;
    state.resolver.resolve(token).await
}
