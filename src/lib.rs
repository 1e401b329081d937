//! # Gaming Realm
//!
//! A social content backend for game-related posts, built around two core
//! components: a cursor-based paginator and an injected session resolver.
//!
//! ## Features
//!
//! - **Cursor Pagination**: Seek-based paging that stays stable while rows
//!   are inserted or deleted around the reader
//! - **Session Auth**: Header-token sessions resolved through a pluggable
//!   store, one live session per user
//! - **Posts & Media**: Multipart post creation with validated image
//!   uploads to an object store
//! - **Comments & Ratings**: Paginated comments and per-user rating upsert
//! - **Soft Delete**: Deleted posts keep their row but vanish from listings
//! - **Configuration-Based**: Page sizes, session TTL and upload limits via
//!   YAML configuration
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gaming_realm::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let state = AppState::in_memory(AppConfig::default());
//!     let app = build_router(state);
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        entity::Record,
        error::{ApiError, ApiResult, EntityError, PageError, SessionError, ValidationError},
        field::FieldValue,
        page::{Cursor, Page, PageRequest},
        paginator::paginate,
        session::{Session, SessionResolver, SessionStore},
    };

    // === Storage ===
    pub use crate::storage::{
        Direction, Filter, InMemoryObjectStore, InMemorySessionStore, InMemoryStore, ObjectStore,
        RecordStore, Sort, StoreError,
    };

    // === Entities ===
    pub use crate::entities::{
        Post, PostComment, PostMedia, PostRating, Tag, User, UserPublic,
    };

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{AppState, build_router};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
