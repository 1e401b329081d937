//! In-memory store implementations for testing and development
//!
//! All three stores follow the same shape: a `HashMap` behind an
//! `Arc<RwLock>`, cloned handles sharing the map. Lock poisoning surfaces
//! as a backend error rather than a panic.

use crate::core::entity::Record;
use crate::core::session::{Session, SessionStore};
use crate::storage::{Direction, Filter, ObjectStore, RecordStore, Sort, StoreError};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use uuid::Uuid;

fn lock_error<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Backend {
        message: format!("failed to acquire lock: {}", e),
    }
}

/// In-memory record store
#[derive(Clone)]
pub struct InMemoryStore<T: Record> {
    records: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Record> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Sort records into the total `(sort key, id)` order used for seeks.
    ///
    /// The ascending id tie-break makes the order total even when sort
    /// keys collide, which cursor pagination depends on.
    fn sort_rows(rows: &mut [T], sort: &Sort) {
        rows.sort_by(|a, b| {
            let ka = a.field_value(sort.field).unwrap_or(crate::core::FieldValue::Null);
            let kb = b.field_value(sort.field).unwrap_or(crate::core::FieldValue::Null);
            let primary = match sort.direction {
                Direction::Asc => ka.compare(&kb),
                Direction::Desc => kb.compare(&ka),
            };
            primary.then_with(|| a.id().cmp(&b.id()))
        });
    }
}

impl<T: Record> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for InMemoryStore<T> {
    async fn insert(&self, record: T) -> Result<T, StoreError> {
        let mut records = self.records.write().map_err(lock_error)?;
        records.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>, StoreError> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records.get(id).cloned())
    }

    async fn update(&self, id: &Uuid, record: T) -> Result<T, StoreError> {
        let mut records = self.records.write().map_err(lock_error)?;
        if !records.contains_key(id) {
            return Err(StoreError::RecordNotFound { id: *id });
        }
        records.insert(*id, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, StoreError> {
        let mut records = self.records.write().map_err(lock_error)?;
        Ok(records.remove(id).is_some())
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<T>, StoreError> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records
            .values()
            .filter(|r| filter.matches(*r))
            .cloned()
            .collect())
    }

    async fn fetch_after(
        &self,
        anchor: Option<Uuid>,
        limit: usize,
        filter: &Filter,
        sort: &Sort,
    ) -> Result<Vec<T>, StoreError> {
        let records = self.records.read().map_err(lock_error)?;
        let mut rows: Vec<T> = records
            .values()
            .filter(|r| filter.matches(*r))
            .cloned()
            .collect();
        drop(records);

        Self::sort_rows(&mut rows, sort);

        let start = match anchor {
            None => 0,
            Some(id) => {
                let position = rows
                    .iter()
                    .position(|r| r.id() == id)
                    .ok_or(StoreError::AnchorNotFound { id })?;
                position + 1
            }
        };

        Ok(rows.into_iter().skip(start).take(limit).collect())
    }

    async fn search(
        &self,
        field: &'static str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<T>, StoreError> {
        let words: Vec<String> = query
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect();

        let records = self.records.read().map_err(lock_error)?;
        let mut rows: Vec<T> = records
            .values()
            .filter(|r| !r.is_deleted())
            .filter(|r| {
                r.field_value(field)
                    .and_then(|v| v.as_string().map(|s| s.to_lowercase()))
                    .is_some_and(|haystack| words.iter().all(|w| haystack.contains(w)))
            })
            .cloned()
            .collect();
        drop(records);

        Self::sort_rows(&mut rows, &Sort::asc("created_at"));
        rows.truncate(limit);
        Ok(rows)
    }
}

/// In-memory session store.
///
/// Keeps at most one live session per user: creating a new session drops
/// the user's previous one. Expiry is a TTL from creation; an expired
/// session behaves exactly like an absent one, and the read path never
/// mutates the map.
#[derive(Clone)]
pub struct InMemorySessionStore {
    inner: Arc<RwLock<SessionMaps>>,
    ttl: Option<Duration>,
}

#[derive(Default)]
struct SessionMaps {
    sessions: HashMap<Uuid, Session>,
    logged_in_users: HashMap<Uuid, Uuid>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionMaps::default())),
            ttl: None,
        }
    }

    /// Sessions expire `ttl` after creation
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionMaps::default())),
            ttl: Some(ttl),
        }
    }

    fn is_expired(&self, session: &Session) -> bool {
        match self.ttl {
            None => false,
            Some(ttl) => {
                let age = Utc::now() - session.created_at;
                age >= chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero())
            }
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &Uuid) -> Result<Option<Session>, StoreError> {
        let inner = self.inner.read().map_err(lock_error)?;
        Ok(inner
            .sessions
            .get(id)
            .filter(|s| !self.is_expired(s))
            .cloned())
    }

    async fn create(&self, user_id: Uuid) -> Result<Session, StoreError> {
        let mut inner = self.inner.write().map_err(lock_error)?;
        if let Some(previous) = inner.logged_in_users.remove(&user_id) {
            inner.sessions.remove(&previous);
        }
        let session = Session::new(user_id);
        inner.sessions.insert(session.id, session.clone());
        inner.logged_in_users.insert(user_id, session.id);
        Ok(session)
    }

    async fn revoke(&self, id: &Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(lock_error)?;
        match inner.sessions.remove(id) {
            Some(session) => {
                inner.logged_in_users.remove(&session.user_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory object store.
///
/// Keeps uploaded blobs in a map and serves deterministic public URLs
/// from a configured base. `unreachable()` builds a store whose uploads
/// always fail, for exercising the degraded path.
#[derive(Clone)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, (String, Bytes)>>>,
    base_url: String,
    reachable: bool,
}

impl InMemoryObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            base_url: base_url.into(),
            reachable: true,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            base_url: String::new(),
            reachable: false,
        }
    }

    /// Fetch a stored blob (test helper)
    pub fn object(&self, path: &str) -> Option<(String, Bytes)> {
        self.objects.read().ok()?.get(path).cloned()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<String, StoreError> {
        if !self.reachable {
            return Err(StoreError::Backend {
                message: "object storage is not reachable".to_string(),
            });
        }
        let mut objects = self.objects.write().map_err(lock_error)?;
        objects.insert(path.to_string(), (content_type.to_string(), data));
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), path))
    }
}
