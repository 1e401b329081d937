//! Tag listing

use crate::core::error::ApiError;
use crate::entities::Tag;
use crate::server::AppState;
use crate::storage::Filter;
use axum::Json;
use axum::extract::State;

/// `GET /tags/`
///
/// Every tag ever attached to a post, alphabetically.
pub async fn get_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    let mut tags = state.tags.find(&Filter::new()).await?;
    tags.sort_by(|a, b| a.tag_name.cmp(&b.tag_name));
    Ok(Json(tags))
}
