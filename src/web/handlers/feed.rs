//! Feed handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::feed::{FeedRepository, NewFeed};
use crate::web::dto::{CreateFeedRequest, FeedResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /v1/feeds - Register a feed.
///
/// A feed URL can only be registered once; a second registration is a 409.
pub async fn create_feed(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateFeedRequest>,
) -> Result<(StatusCode, Json<FeedResponse>), ApiError> {
    let feed = FeedRepository::new(state.db.pool())
        .create(&NewFeed::new(req.name.trim(), req.url, user.id))
        .await?;

    tracing::info!(feed_id = %feed.id, url = %feed.url, "Feed created");

    Ok((StatusCode::CREATED, Json(feed.into())))
}

/// GET /v1/feeds - All feeds, oldest first.
pub async fn list_feeds(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FeedResponse>>, ApiError> {
    let feeds = FeedRepository::new(state.db.pool()).list_all().await?;

    Ok(Json(feeds.into_iter().map(FeedResponse::from).collect()))
}
