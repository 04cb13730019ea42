//! Post handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use validator::Validate;

use crate::feed::PostRepository;
use crate::web::dto::{PostResponse, PostsQuery};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// GET /v1/posts - Newest posts from the caller's followed feeds.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    query: Result<Query<PostsQuery>, QueryRejection>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    query.validate().map_err(ApiError::from_validation_errors)?;

    let posts = PostRepository::new(state.db.pool())
        .list_for_user(user.id, query.effective_limit())
        .await?;

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}
