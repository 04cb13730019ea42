//! Request DTOs.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::validation::{http_url, no_control_chars, not_empty_trimmed};
use crate::feed::{DEFAULT_POSTS_LIMIT, MAX_POSTS_LIMIT};

/// `POST /v1/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(max = 100, message = "Must be at most 100 characters"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub name: String,
}

/// `POST /v1/feeds`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedRequest {
    #[validate(
        length(max = 200, message = "Must be at most 200 characters"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub name: String,
    #[validate(
        length(max = 2048, message = "Must be at most 2048 characters"),
        custom(function = "http_url")
    )]
    pub url: String,
}

/// `POST /v1/feed_follows`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedFollowRequest {
    pub feed_id: Uuid,
}

/// Query string of `GET /v1/posts`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PostsQuery {
    #[validate(range(min = 1, message = "Must be at least 1"))]
    pub limit: Option<i64>,
}

impl PostsQuery {
    /// Requested limit, defaulted and capped.
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_POSTS_LIMIT)
            .min(MAX_POSTS_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_feed_request_validation() {
        let ok = CreateFeedRequest {
            name: "Example".to_string(),
            url: "https://example.com/rss".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_url = CreateFeedRequest {
            name: "Example".to_string(),
            url: "gopher://example.com".to_string(),
        };
        let errors = bad_url.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("url"));

        let blank_name = CreateFeedRequest {
            name: "  ".to_string(),
            url: "https://example.com/rss".to_string(),
        };
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_create_user_request_validation() {
        let ok = CreateUserRequest {
            name: "alice".to_string(),
        };
        assert!(ok.validate().is_ok());

        let too_long = CreateUserRequest {
            name: "a".repeat(101),
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_posts_query_limit() {
        assert_eq!(PostsQuery::default().effective_limit(), 10);
        assert_eq!(PostsQuery { limit: Some(25) }.effective_limit(), 25);
        assert_eq!(PostsQuery { limit: Some(5000) }.effective_limit(), 100);

        assert!(PostsQuery { limit: Some(0) }.validate().is_err());
        assert!(PostsQuery { limit: None }.validate().is_ok());
    }
}
