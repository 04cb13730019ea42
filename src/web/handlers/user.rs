//! User handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::db::{NewUser, UserRepository};
use crate::web::dto::{CreateUserRequest, UserResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /v1/users - Register a user and issue an API key.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = UserRepository::new(state.db.pool())
        .create(&NewUser::new(req.name.trim()))
        .await?;

    tracing::info!(user_id = %user.id, "User created");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /v1/users - The authenticated user.
pub async fn get_user(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(user.into())
}
