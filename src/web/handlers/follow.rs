//! Feed follow handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::feed::{FeedFollowRepository, FeedRepository};
use crate::web::dto::{CreateFeedFollowRequest, EmptyResponse, FeedFollowResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// GET /v1/feed_follows - The caller's follows.
pub async fn list_feed_follows(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<FeedFollowResponse>>, ApiError> {
    let follows = FeedFollowRepository::new(state.db.pool())
        .list_by_user(user.id)
        .await?;

    Ok(Json(
        follows.into_iter().map(FeedFollowResponse::from).collect(),
    ))
}

/// POST /v1/feed_follows - Follow a feed.
pub async fn create_feed_follow(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateFeedFollowRequest>,
) -> Result<(StatusCode, Json<FeedFollowResponse>), ApiError> {
    let pool = state.db.pool();

    if FeedRepository::new(pool)
        .get_by_id(req.feed_id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found("Feed not found"));
    }

    let follow = FeedFollowRepository::new(pool)
        .create(user.id, req.feed_id)
        .await?;

    Ok((StatusCode::CREATED, Json(follow.into())))
}

/// DELETE /v1/feed_follows/:id - Unfollow.
///
/// Follows owned by other users are reported as missing.
pub async fn delete_feed_follow(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    follow_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let Path(follow_id) =
        follow_id.map_err(|_| ApiError::bad_request("Invalid feed follow ID"))?;

    let deleted = FeedFollowRepository::new(state.db.pool())
        .delete(follow_id, user.id)
        .await?;

    if !deleted {
        return Err(ApiError::not_found("Feed follow not found"));
    }

    Ok(Json(EmptyResponse::default()))
}
