//! Post, comment, rating, media and tag records plus their wire models

use crate::core::entity::Record;
use crate::core::field::FieldValue;
use crate::core::page::Page;
use crate::entities::user::UserPublic;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A post in the feed. Deletion is soft: the row keeps existing but
/// disappears from listings.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text_content: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn new(author_id: Uuid, title: String, text_content: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            text_content,
            tags: Vec::new(),
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    pub fn soft_delete(&mut self) {
        self.deleted_at = Some(Utc::now());
    }
}

impl Record for Post {
    fn record_type() -> &'static str {
        "post"
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
            "author_id" => Some(self.author_id.into()),
            "title" => Some(self.title.clone().into()),
            "tags" => Some(FieldValue::StringList(self.tags.clone())),
            "created_at" => Some(self.created_at.into()),
            "deleted" => Some(self.is_deleted().into()),
            _ => None,
        }
    }
}

/// A comment on a post
#[derive(Debug, Clone, Serialize)]
pub struct PostComment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl PostComment {
    pub fn new(post_id: Uuid, author_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            content,
            created_at: Utc::now(),
        }
    }
}

impl Record for PostComment {
    fn record_type() -> &'static str {
        "post_comment"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(self.id.into()),
            "post_id" => Some(self.post_id.into()),
            "author_id" => Some(self.author_id.into()),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

/// A rating on a post, unique per (post, author)
#[derive(Debug, Clone, Serialize)]
pub struct PostRating {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub value: i64,
    pub created_at: DateTime<Utc>,
}

impl PostRating {
    pub fn new(post_id: Uuid, author_id: Uuid, value: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            value,
            created_at: Utc::now(),
        }
    }
}

impl Record for PostRating {
    fn record_type() -> &'static str {
        "post_rating"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(self.id.into()),
            "post_id" => Some(self.post_id.into()),
            "author_id" => Some(self.author_id.into()),
            "value" => Some(self.value.into()),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

/// An uploaded media object attached to a post
#[derive(Debug, Clone, Serialize)]
pub struct PostMedia {
    pub id: Uuid,
    pub post_id: Uuid,
    pub object_url: String,
    pub created_at: DateTime<Utc>,
}

impl PostMedia {
    pub fn new(post_id: Uuid, object_url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            object_url,
            created_at: Utc::now(),
        }
    }
}

impl Record for PostMedia {
    fn record_type() -> &'static str {
        "post_media"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(self.id.into()),
            "post_id" => Some(self.post_id.into()),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

/// A tag that posts can carry
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    pub id: Uuid,
    pub tag_name: String,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(tag_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            tag_name,
            created_at: Utc::now(),
        }
    }
}

impl Record for Tag {
    fn record_type() -> &'static str {
        "tag"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(self.id.into()),
            "tag_name" => Some(self.tag_name.clone().into()),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

// =============================================================================
// Wire models
// =============================================================================

/// A post hydrated with its author and media URLs
#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub author: Option<UserPublic>,
    pub title: String,
    pub text_content: Option<String>,
    pub tags: Vec<String>,
    pub media: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A comment hydrated with its author
#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: Option<UserPublic>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Full details of a single post
#[derive(Debug, Serialize)]
pub struct PostDetails {
    pub post: PostView,
    pub comments: Page<CommentView>,
    pub avg_rating: i64,
}

/// Response for post creation
#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text_content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub urls: Vec<String>,
}

/// Rating payload
#[derive(Debug, Deserialize, Validate)]
pub struct RatingBody {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5."))]
    pub rating: i64,
}

/// Generic message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
