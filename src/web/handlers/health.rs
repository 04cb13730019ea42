//! Readiness and error probes.

use axum::Json;

use crate::web::dto::EmptyResponse;
use crate::web::error::ApiError;

/// GET /v1/healthz
pub async fn readiness() -> Json<EmptyResponse> {
    Json(EmptyResponse::default())
}

/// GET /v1/err - Always fails; used to check error rendering.
pub async fn error() -> ApiError {
    ApiError::internal("Something went wrong")
}
