//! Sessions and session resolution
//!
//! A session is created by the login flow and looked up read-only on every
//! authorized request. The resolver collapses absent, malformed, unknown
//! and expired tokens into one outward error so the response leaks nothing
//! about which case occurred.

use crate::core::error::{ApiError, SessionError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::storage::StoreError;

/// A user session
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// Storage backend for sessions.
///
/// Expiry policy belongs to the store: an expired session behaves exactly
/// like an absent one on lookup. Implementations must be safe under
/// unbounded concurrent callers.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up a live session by id. Expired sessions return `None`.
    async fn get(&self, id: &Uuid) -> Result<Option<Session>, StoreError>;

    /// Create a session for the user, replacing any previous one they had
    async fn create(&self, user_id: Uuid) -> Result<Session, StoreError>;

    /// Revoke a session. Returns whether it existed.
    async fn revoke(&self, id: &Uuid) -> Result<bool, StoreError>;
}

/// Resolves a presented session token to a user identity.
///
/// Stateless: the token travels as a parameter and the store is an
/// injected collaborator, so any number of requests may resolve
/// concurrently.
#[derive(Clone)]
pub struct SessionResolver {
    store: Arc<dyn SessionStore>,
}

impl SessionResolver {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Resolve a token to the owning user's id.
    ///
    /// Read-only; a store failure propagates as an internal error, never
    /// as `InvalidSession`.
    pub async fn resolve(&self, token: &str) -> Result<Uuid, ApiError> {
        let Ok(id) = Uuid::parse_str(token) else {
            return Err(SessionError::Invalid.into());
        };
        tracing::trace!(session_id = %id, "attempting authorization");
        match self.store.get(&id).await? {
            Some(session) => Ok(session.user_id),
            None => Err(SessionError::Invalid.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemorySessionStore;
    use std::time::Duration;

    fn resolver(store: InMemorySessionStore) -> SessionResolver {
        SessionResolver::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_valid_token_resolves_to_user() {
        let store = InMemorySessionStore::new();
        let user_id = Uuid::new_v4();
        let session = store.create(user_id).await.unwrap();

        let resolver = resolver(store);
        let token = session.id.to_string();
        // deterministic across repeated calls
        assert_eq!(resolver.resolve(&token).await.unwrap(), user_id);
        assert_eq!(resolver.resolve(&token).await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_unknown_token_is_invalid() {
        let resolver = resolver(InMemorySessionStore::new());
        let err = resolver.resolve(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, ApiError::Session(SessionError::Invalid)));
    }

    #[tokio::test]
    async fn test_malformed_token_is_invalid() {
        let resolver = resolver(InMemorySessionStore::new());
        let err = resolver.resolve("definitely-not-a-uuid").await.unwrap_err();
        assert!(matches!(err, ApiError::Session(SessionError::Invalid)));
    }

    #[tokio::test]
    async fn test_expired_token_is_invalid() {
        let store = InMemorySessionStore::with_ttl(Duration::from_secs(0));
        let session = store.create(Uuid::new_v4()).await.unwrap();

        let resolver = resolver(store);
        let err = resolver.resolve(&session.id.to_string()).await.unwrap_err();
        assert!(matches!(err, ApiError::Session(SessionError::Invalid)));
    }

    #[tokio::test]
    async fn test_revoked_token_is_invalid() {
        let store = InMemorySessionStore::new();
        let session = store.create(Uuid::new_v4()).await.unwrap();
        assert!(store.revoke(&session.id).await.unwrap());

        let resolver = resolver(store);
        let err = resolver.resolve(&session.id.to_string()).await.unwrap_err();
        assert!(matches!(err, ApiError::Session(SessionError::Invalid)));
    }

    #[tokio::test]
    async fn test_store_failure_is_not_invalid_session() {
        struct FailingStore;

        #[async_trait]
        impl SessionStore for FailingStore {
            async fn get(&self, _id: &Uuid) -> Result<Option<Session>, StoreError> {
                Err(StoreError::Backend {
                    message: "down".to_string(),
                })
            }

            async fn create(&self, _user_id: Uuid) -> Result<Session, StoreError> {
                Err(StoreError::Backend {
                    message: "down".to_string(),
                })
            }

            async fn revoke(&self, _id: &Uuid) -> Result<bool, StoreError> {
                Err(StoreError::Backend {
                    message: "down".to_string(),
                })
            }
        }

        let resolver = SessionResolver::new(Arc::new(FailingStore));
        let err = resolver.resolve(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, ApiError::Store(_)));
    }

    #[tokio::test]
    async fn test_new_session_replaces_previous_for_same_user() {
        let store = InMemorySessionStore::new();
        let user_id = Uuid::new_v4();
        let first = store.create(user_id).await.unwrap();
        let second = store.create(user_id).await.unwrap();

        assert!(store.get(&first.id).await.unwrap().is_none());
        assert_eq!(
            store.get(&second.id).await.unwrap().unwrap().user_id,
            user_id
        );
    }
}
