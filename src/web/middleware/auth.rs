//! API key authentication.
//!
//! Clients send `Authorization: ApiKey <key>`.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::db::{User, UserRepository};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::{AggregatorError, Result};

/// Authorization scheme expected in front of the key.
const API_KEY_SCHEME: &str = "ApiKey";

/// Extract the API key from request headers.
///
/// The header must hold exactly two space-separated parts, the first being
/// `ApiKey`.
pub fn get_api_key(headers: &HeaderMap) -> Result<String> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AggregatorError::Auth("no authorization header".to_string()))?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [API_KEY_SCHEME, key] if !key.is_empty() => Ok(key.to_string()),
        _ => Err(AggregatorError::Auth(
            "malformed authorization header".to_string(),
        )),
    }
}

/// Extractor for the user owning the presented API key.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> std::result::Result<Self, Self::Rejection> {
        let api_key = get_api_key(&parts.headers).map_err(|e| {
            tracing::debug!("Rejected request: {}", e);
            ApiError::unauthorized("Couldn't get user")
        })?;

        let user = UserRepository::new(state.db.pool())
            .get_by_api_key(&api_key)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Couldn't get user"))?;

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_get_api_key() {
        assert_eq!(get_api_key(&headers("ApiKey abc123")).unwrap(), "abc123");
    }

    #[test]
    fn test_get_api_key_missing_header() {
        let result = get_api_key(&HeaderMap::new());
        assert!(matches!(result, Err(AggregatorError::Auth(_))));
    }

    #[test]
    fn test_get_api_key_malformed() {
        for value in [
            "",
            "ApiKey",
            "ApiKey ",
            "Bearer abc123",
            "apikey abc123",
            "ApiKey abc 123",
            "abc123",
        ] {
            assert!(get_api_key(&headers(value)).is_err(), "accepted {value:?}");
        }
    }
}
