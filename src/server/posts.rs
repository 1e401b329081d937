//! Post feed, creation, search, details, comments and ratings

use crate::core::entity::Record;
use crate::core::error::{ApiError, EntityError, UploadError, ValidationError};
use crate::core::page::{Page, PageRequest};
use crate::core::paginator::paginate;
use crate::entities::{
    CommentView, CreatePostResponse, MessageResponse, Post, PostComment, PostDetails, PostMedia,
    PostRating, PostView, RatingBody, Tag, UserPublic,
};
use crate::server::AppState;
use crate::server::extract::{PageHeaders, authorize};
use crate::storage::{Filter, Sort, StoreError};
use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::HeaderMap;
use bytes::Bytes;
use serde::Deserialize;
use std::collections::HashSet;
use uuid::Uuid;
use validator::Validate;

/// Feed filters: by author and/or tag
#[derive(Debug, Deserialize, Default)]
pub struct FeedQuery {
    pub uid: Option<Uuid>,
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub comment_text: String,
}

async fn post_view(state: &AppState, post: Post) -> Result<PostView, ApiError> {
    let author = state
        .users
        .get(&post.author_id)
        .await?
        .as_ref()
        .map(UserPublic::from);
    let mut media = state
        .media
        .find(&Filter::new().eq("post_id", post.id))
        .await?;
    media.sort_by_key(|m| (m.created_at, m.id));
    Ok(PostView {
        id: post.id,
        author,
        title: post.title,
        text_content: post.text_content,
        tags: post.tags,
        media: media.into_iter().map(|m| m.object_url).collect(),
        created_at: post.created_at,
    })
}

async fn comment_view(state: &AppState, comment: PostComment) -> Result<CommentView, ApiError> {
    let author = state
        .users
        .get(&comment.author_id)
        .await?
        .as_ref()
        .map(UserPublic::from);
    Ok(CommentView {
        id: comment.id,
        post_id: comment.post_id,
        author,
        content: comment.content,
        created_at: comment.created_at,
    })
}

/// `GET /post/`
///
/// Paginated feed, newest first, filtered by author and/or tag.
/// Pagination travels in the `take` and `cursor` request headers.
pub async fn get_posts(
    State(state): State<AppState>,
    page_headers: PageHeaders,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Page<PostView>>, ApiError> {
    let (request, cursor) = page_headers.page_request(
        state.config.pagination.default_page_size,
        state.config.pagination.max_page_size,
    )?;

    let mut filter = Filter::new().eq("deleted", false);
    if let Some(uid) = query.uid {
        filter = filter.eq("author_id", uid);
    }
    if let Some(tag) = query.tag {
        filter = filter.has("tags", tag);
    }

    let page = paginate(
        state.posts.as_ref(),
        request,
        cursor,
        &filter,
        &Sort::desc("created_at"),
    )
    .await?;

    let cursor_id = page.cursor_id;
    let mut views = Vec::with_capacity(page.data.len());
    for post in page.data {
        views.push(post_view(&state, post).await?);
    }
    Ok(Json(Page::new(views, cursor_id)))
}

/// `POST /post/create`
///
/// Authorized multipart form: `title`, optional `text_content`, optional
/// comma-separated `tags`, and any number of image parts named `images`.
/// Media is validated, uploaded under `{user_id}/{post_id}/` and recorded
/// against the post.
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<CreatePostResponse>, ApiError> {
    let user_id = authorize(&state, &headers).await?;

    let mut title: Option<String> = None;
    let mut text_content: Option<String> = None;
    let mut tags: Vec<String> = Vec::new();
    let mut images: Vec<(String, String, Bytes)> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::Upload(UploadError::InvalidBody {
            message: e.to_string(),
        })
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => {
                title = Some(field.text().await.map_err(|e| {
                    ApiError::Upload(UploadError::InvalidBody {
                        message: e.to_string(),
                    })
                })?);
            }
            "text_content" => {
                text_content = Some(field.text().await.map_err(|e| {
                    ApiError::Upload(UploadError::InvalidBody {
                        message: e.to_string(),
                    })
                })?);
            }
            "tags" => {
                let raw = field.text().await.map_err(|e| {
                    ApiError::Upload(UploadError::InvalidBody {
                        message: e.to_string(),
                    })
                })?;
                tags = raw
                    .split(',')
                    .map(|t| t.trim().to_lowercase())
                    .filter(|t| !t.is_empty())
                    .collect();
                tags.sort();
                tags.dedup();
            }
            "images" => {
                let filename = field
                    .file_name()
                    .map(|f| f.to_string())
                    .ok_or(UploadError::MissingFilename)?;
                let content_type = field.content_type().unwrap_or_default().to_string();
                if !state.config.uploads.allowed_types.contains(&content_type) {
                    return Err(UploadError::UnsupportedType { filename }.into());
                }
                let data = field.bytes().await.map_err(|e| {
                    ApiError::Upload(UploadError::InvalidBody {
                        message: e.to_string(),
                    })
                })?;
                if data.len() as u64 > state.config.uploads.max_bytes {
                    return Err(UploadError::TooLarge {
                        filename,
                        max_bytes: state.config.uploads.max_bytes,
                    }
                    .into());
                }
                images.push((filename, content_type, data));
            }
            _ => {}
        }
    }

    let title = title.ok_or_else(|| ValidationError::field("title", "is required"))?;
    if title.trim().is_empty() {
        return Err(ValidationError::field("title", "must not be empty").into());
    }

    let mut post = Post::new(user_id, title, text_content);
    post.tags = tags.clone();
    let post = state.posts.insert(post).await?;

    // tags are registered globally the first time they are seen
    for tag_name in tags {
        let known = state
            .tags
            .find(&Filter::new().eq("tag_name", tag_name.clone()))
            .await?;
        if known.is_empty() {
            state.tags.insert(Tag::new(tag_name)).await?;
        }
    }

    let mut urls = Vec::with_capacity(images.len());
    let mut taken_names: HashSet<String> = HashSet::new();
    for (filename, content_type, data) in images {
        // duplicate filenames within one post get a random suffix
        let filename = if taken_names.contains(&filename) {
            let (stem, ext) = match filename.rfind('.') {
                Some(dot) => (&filename[..dot], &filename[dot..]),
                None => (filename.as_str(), ""),
            };
            format!("{}-{}{}", stem, Uuid::new_v4().simple(), ext)
        } else {
            filename
        };
        taken_names.insert(filename.clone());

        let path = format!("{}/{}/{}", user_id, post.id, filename);
        let url = state
            .objects
            .upload(&path, &content_type, data)
            .await
            .map_err(|e| match e {
                StoreError::Backend { .. } => ApiError::Upload(UploadError::StorageUnreachable),
                other => ApiError::Store(other),
            })?;
        state
            .media
            .insert(PostMedia::new(post.id, url.clone()))
            .await?;
        urls.push(url);
    }

    tracing::info!(post_id = %post.id, author_id = %user_id, media = urls.len(), "post created");
    Ok(Json(CreatePostResponse {
        id: post.id,
        author_id: post.author_id,
        title: post.title,
        text_content: post.text_content,
        created_at: post.created_at,
        urls,
    }))
}

/// `GET /post/search?q=`
///
/// Every word of the query must match the title. Single page, capped.
pub async fn search_posts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Page<PostView>>, ApiError> {
    let hits = state
        .posts
        .search("title", &query.q, state.config.pagination.search_limit)
        .await?;

    let mut views = Vec::with_capacity(hits.len());
    for post in hits {
        views.push(post_view(&state, post).await?);
    }
    Ok(Json(Page::last(views)))
}

/// `GET /post/{id}`
///
/// Full details: hydrated post, first page of comments, average rating.
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostDetails>, ApiError> {
    let post = state
        .posts
        .get(&id)
        .await?
        .filter(|p| !p.is_deleted())
        .ok_or_else(|| EntityError::not_found("post"))?;

    let comments = paginate(
        state.comments.as_ref(),
        PageRequest::of(state.config.pagination.comments_page_size),
        None,
        &Filter::new().eq("post_id", id),
        &Sort::desc("created_at"),
    )
    .await?;
    let comments_cursor = comments.cursor_id;
    let mut comment_views = Vec::with_capacity(comments.data.len());
    for comment in comments.data {
        comment_views.push(comment_view(&state, comment).await?);
    }

    let ratings = state
        .ratings
        .find(&Filter::new().eq("post_id", id))
        .await?;
    let avg_rating = if ratings.is_empty() {
        0
    } else {
        let sum: i64 = ratings.iter().map(|r| r.value).sum();
        (sum as f64 / ratings.len() as f64).round() as i64
    };

    Ok(Json(PostDetails {
        post: post_view(&state, post).await?,
        comments: Page::new(comment_views, comments_cursor),
        avg_rating,
    }))
}

/// `DELETE /post/{id}`
///
/// Soft delete, author-scoped: only the author's own live post matches.
pub async fn delete_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = authorize(&state, &headers).await?;

    let mut post = state
        .posts
        .get(&id)
        .await?
        .filter(|p| p.author_id == user_id && !p.is_deleted())
        .ok_or_else(|| EntityError::not_found("post"))?;

    post.soft_delete();
    state.posts.update(&id, post).await?;
    Ok(Json(MessageResponse::new("Post deleted.")))
}

/// `POST /post/{post_id}/comments`
pub async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<Uuid>,
    Json(body): Json<CommentBody>,
) -> Result<Json<PostComment>, ApiError> {
    let user_id = authorize(&state, &headers).await?;

    state
        .posts
        .get(&post_id)
        .await?
        .filter(|p| !p.is_deleted())
        .ok_or_else(|| EntityError::not_found("post"))?;

    let comment = state
        .comments
        .insert(PostComment::new(post_id, user_id, body.comment_text))
        .await?;
    Ok(Json(comment))
}

/// `GET /post/{post_id}/comments`
///
/// Paginated comments for a post, newest first; pagination travels in the
/// `take` and `cursor` request headers.
pub async fn get_comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    page_headers: PageHeaders,
) -> Result<Json<Page<CommentView>>, ApiError> {
    let (request, cursor) = page_headers.page_request(
        state.config.pagination.default_page_size,
        state.config.pagination.max_page_size,
    )?;

    let page = paginate(
        state.comments.as_ref(),
        request,
        cursor,
        &Filter::new().eq("post_id", post_id),
        &Sort::desc("created_at"),
    )
    .await?;

    let cursor_id = page.cursor_id;
    let mut views = Vec::with_capacity(page.data.len());
    for comment in page.data {
        views.push(comment_view(&state, comment).await?);
    }
    Ok(Json(Page::new(views, cursor_id)))
}

/// `DELETE /post/{post_id}/comments/{comment_id}`
///
/// Hard delete, author-scoped.
pub async fn delete_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = authorize(&state, &headers).await?;

    let owned = state
        .comments
        .get(&comment_id)
        .await?
        .is_some_and(|c| c.post_id == post_id && c.author_id == user_id);
    if !owned {
        return Err(EntityError::not_found("comment").into());
    }

    state.comments.delete(&comment_id).await?;
    Ok(Json(MessageResponse::new("Comment deleted.")))
}

/// `POST /post/{post_id}/rating`
///
/// Upsert keyed on (post, author): rating again replaces the value.
pub async fn create_rating(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<Uuid>,
    Json(body): Json<RatingBody>,
) -> Result<Json<PostRating>, ApiError> {
    body.validate()?;
    let user_id = authorize(&state, &headers).await?;

    state
        .posts
        .get(&post_id)
        .await?
        .filter(|p| !p.is_deleted())
        .ok_or_else(|| EntityError::not_found("post"))?;

    let existing = state
        .ratings
        .find(
            &Filter::new()
                .eq("post_id", post_id)
                .eq("author_id", user_id),
        )
        .await?
        .into_iter()
        .next();

    let rating = match existing {
        Some(mut rating) => {
            rating.value = body.rating;
            let rating_id = rating.id;
            state.ratings.update(&rating_id, rating).await?
        }
        None => {
            state
                .ratings
                .insert(PostRating::new(post_id, user_id, body.rating))
                .await?
        }
    };
    Ok(Json(rating))
}
