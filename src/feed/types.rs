//! Feed, follow and post types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Default number of posts returned for a user.
pub const DEFAULT_POSTS_LIMIT: i64 = 10;

/// Upper bound on posts returned for a user.
pub const MAX_POSTS_LIMIT: i64 = 100;

/// A subscribed feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feed {
    /// Feed ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Feed document URL.
    pub url: String,
    /// User who registered the feed.
    pub user_id: Uuid,
    /// Last time the feed was claimed for fetching. `None` = never.
    pub last_fetched_at: Option<DateTime<Utc>>,
    /// When the feed was created.
    pub created_at: DateTime<Utc>,
    /// When the feed was last updated.
    pub updated_at: DateTime<Utc>,
}

/// New feed for creation.
#[derive(Debug, Clone)]
pub struct NewFeed {
    /// Display name.
    pub name: String,
    /// Feed document URL.
    pub url: String,
    /// Owning user.
    pub user_id: Uuid,
}

impl NewFeed {
    /// Create a new feed.
    pub fn new(name: impl Into<String>, url: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            user_id,
        }
    }
}

/// A user's subscription to a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedFollow {
    /// Follow ID.
    pub id: Uuid,
    /// Following user.
    pub user_id: Uuid,
    /// Followed feed.
    pub feed_id: Uuid,
    /// When the follow was created.
    pub created_at: DateTime<Utc>,
    /// When the follow was last updated.
    pub updated_at: DateTime<Utc>,
}

/// An ingested feed item.
///
/// The URL is unique across all posts and is the ingestion idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    /// Post ID.
    pub id: Uuid,
    /// Owning feed.
    pub feed_id: Uuid,
    /// Item title.
    pub title: String,
    /// Item URL.
    pub url: String,
    /// Item description; `None` when the item had none.
    pub description: Option<String>,
    /// When the item was published.
    pub published_at: DateTime<Utc>,
    /// When the post was stored.
    pub created_at: DateTime<Utc>,
    /// When the post was last updated.
    pub updated_at: DateTime<Utc>,
}
