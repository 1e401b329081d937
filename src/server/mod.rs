//! HTTP surface: application state and router assembly

pub mod extract;
pub mod posts;
pub mod tags;
pub mod users;

use crate::config::AppConfig;
use crate::core::session::{SessionResolver, SessionStore};
use crate::entities::{Post, PostComment, PostMedia, PostRating, Tag, User};
use crate::storage::{
    InMemoryObjectStore, InMemorySessionStore, InMemoryStore, ObjectStore, RecordStore,
};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
///
/// Every store is an injected trait object, so handlers and the core
/// components never depend on a concrete backend.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn RecordStore<User>>,
    pub posts: Arc<dyn RecordStore<Post>>,
    pub comments: Arc<dyn RecordStore<PostComment>>,
    pub ratings: Arc<dyn RecordStore<PostRating>>,
    pub media: Arc<dyn RecordStore<PostMedia>>,
    pub tags: Arc<dyn RecordStore<Tag>>,
    pub sessions: Arc<dyn SessionStore>,
    pub resolver: SessionResolver,
    pub objects: Arc<dyn ObjectStore>,
}

impl AppState {
    /// Build a state backed entirely by in-memory stores
    pub fn in_memory(config: AppConfig) -> Self {
        let sessions: Arc<dyn SessionStore> = match config.sessions.ttl_seconds {
            Some(secs) => Arc::new(InMemorySessionStore::with_ttl(Duration::from_secs(secs))),
            None => Arc::new(InMemorySessionStore::new()),
        };
        let objects = Arc::new(InMemoryObjectStore::new(format!(
            "{}/{}",
            config.uploads.public_base_url.trim_end_matches('/'),
            config.uploads.bucket
        )));

        Self {
            config: Arc::new(config),
            users: Arc::new(InMemoryStore::new()),
            posts: Arc::new(InMemoryStore::new()),
            comments: Arc::new(InMemoryStore::new()),
            ratings: Arc::new(InMemoryStore::new()),
            media: Arc::new(InMemoryStore::new()),
            tags: Arc::new(InMemoryStore::new()),
            resolver: SessionResolver::new(sessions.clone()),
            sessions,
            objects,
        }
    }

    /// Swap the object store (used to exercise the unreachable path)
    pub fn with_object_store(mut self, objects: Arc<dyn ObjectStore>) -> Self {
        self.objects = objects;
        self
    }
}

async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Pong!" }))
}

/// Assemble the full application router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ping", get(ping))
        .route("/user/signup", post(users::signup))
        .route("/user/login", post(users::login))
        .route("/user/logout", post(users::logout))
        .route("/post/", get(posts::get_posts))
        .route("/post/create", post(posts::create_post))
        .route("/post/search", get(posts::search_posts))
        .route("/post/{id}", get(posts::get_post).delete(posts::delete_post))
        .route(
            "/post/{post_id}/comments",
            get(posts::get_comments).post(posts::create_comment),
        )
        .route(
            "/post/{post_id}/comments/{comment_id}",
            delete(posts::delete_comment),
        )
        .route("/post/{post_id}/rating", post(posts::create_rating))
        .route("/tags/", get(tags::get_tags))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
