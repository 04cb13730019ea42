//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::User;
use crate::feed::{Feed, FeedFollow, Post};

/// A user, including their API key.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub api_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            api_key: user.api_key,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Feed response.
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub user_id: Uuid,
    pub last_fetched_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Feed> for FeedResponse {
    fn from(feed: Feed) -> Self {
        Self {
            id: feed.id,
            name: feed.name,
            url: feed.url,
            user_id: feed.user_id,
            last_fetched_at: feed.last_fetched_at,
            created_at: feed.created_at,
            updated_at: feed.updated_at,
        }
    }
}

/// Feed follow response.
#[derive(Debug, Serialize)]
pub struct FeedFollowResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub feed_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FeedFollow> for FeedFollowResponse {
    fn from(follow: FeedFollow) -> Self {
        Self {
            id: follow.id,
            user_id: follow.user_id,
            feed_id: follow.feed_id,
            created_at: follow.created_at,
            updated_at: follow.updated_at,
        }
    }
}

/// Post response, as listed by `GET /v1/posts`.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub feed_id: Uuid,
    pub title: String,
    pub url: String,
    /// `null` when the item had no description.
    pub description: Option<String>,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            feed_id: post.feed_id,
            title: post.title,
            url: post.url,
            description: post.description,
            published_at: post.published_at,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Empty JSON object, used by the health and delete endpoints.
#[derive(Debug, Default, Serialize)]
pub struct EmptyResponse {}
