//! Router configuration.

use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_feed, create_feed_follow, create_user, delete_feed_follow, error, get_user,
    list_feed_follows, list_feeds, list_posts, readiness, AppState,
};
use super::middleware::create_cors_layer;

/// Build the API router with every route nested under `/v1`.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let v1 = Router::new()
        .route("/healthz", get(readiness))
        .route("/err", get(error))
        .route("/users", get(get_user).post(create_user))
        .route("/feeds", get(list_feeds).post(create_feed))
        .route(
            "/feed_follows",
            get(list_feed_follows).post(create_feed_follow),
        )
        .route("/feed_follows/:id", delete(delete_feed_follow))
        .route("/posts", get(list_posts));

    Router::new()
        .nest("/v1", v1)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}
