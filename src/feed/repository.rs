//! Feed, follow and post repositories.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::types::{Feed, FeedFollow, NewFeed, Post};
use crate::datetime::{format_timestamp, now, parse_timestamp};
use crate::db::repository::parse_id;
use crate::{AggregatorError, Result};

const FEED_COLUMNS: &str = "id, name, url, user_id, last_fetched_at, created_at, updated_at";

const POST_COLUMNS: &str =
    "id, feed_id, title, url, description, published_at, created_at, updated_at";

/// Row type for feeds.
#[derive(Debug, Clone, sqlx::FromRow)]
struct FeedRow {
    id: String,
    name: String,
    url: String,
    user_id: String,
    last_fetched_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<FeedRow> for Feed {
    type Error = AggregatorError;

    fn try_from(row: FeedRow) -> Result<Self> {
        Ok(Feed {
            id: parse_id(&row.id)?,
            name: row.name,
            url: row.url,
            user_id: parse_id(&row.user_id)?,
            last_fetched_at: row.last_fetched_at.as_deref().and_then(parse_timestamp),
            created_at: parse_timestamp(&row.created_at).unwrap_or_default(),
            updated_at: parse_timestamp(&row.updated_at).unwrap_or_default(),
        })
    }
}

/// Row type for feed follows.
#[derive(Debug, Clone, sqlx::FromRow)]
struct FeedFollowRow {
    id: String,
    user_id: String,
    feed_id: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<FeedFollowRow> for FeedFollow {
    type Error = AggregatorError;

    fn try_from(row: FeedFollowRow) -> Result<Self> {
        Ok(FeedFollow {
            id: parse_id(&row.id)?,
            user_id: parse_id(&row.user_id)?,
            feed_id: parse_id(&row.feed_id)?,
            created_at: parse_timestamp(&row.created_at).unwrap_or_default(),
            updated_at: parse_timestamp(&row.updated_at).unwrap_or_default(),
        })
    }
}

/// Row type for posts.
#[derive(Debug, Clone, sqlx::FromRow)]
struct PostRow {
    id: String,
    feed_id: String,
    title: String,
    url: String,
    description: Option<String>,
    published_at: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<PostRow> for Post {
    type Error = AggregatorError;

    fn try_from(row: PostRow) -> Result<Self> {
        Ok(Post {
            id: parse_id(&row.id)?,
            feed_id: parse_id(&row.feed_id)?,
            title: row.title,
            url: row.url,
            description: row.description,
            published_at: parse_timestamp(&row.published_at).unwrap_or_default(),
            created_at: parse_timestamp(&row.created_at).unwrap_or_default(),
            updated_at: parse_timestamp(&row.updated_at).unwrap_or_default(),
        })
    }
}

fn collect<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = AggregatorError>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// Repository for feed operations.
pub struct FeedRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FeedRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new feed. A URL that is already registered yields `Duplicate`.
    pub async fn create(&self, feed: &NewFeed) -> Result<Feed> {
        let id = Uuid::new_v4();
        let ts = format_timestamp(&now());

        sqlx::query(
            "INSERT INTO feeds (id, name, url, user_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&feed.name)
        .bind(&feed.url)
        .bind(feed.user_id.to_string())
        .bind(&ts)
        .bind(&ts)
        .execute(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| AggregatorError::NotFound("feed".to_string()))
    }

    /// Get a feed by ID.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Feed>> {
        let query = format!("SELECT {FEED_COLUMNS} FROM feeds WHERE id = ?");
        let row = sqlx::query_as::<_, FeedRow>(&query)
            .bind(id.to_string())
            .fetch_optional(self.pool)
            .await?;

        row.map(Feed::try_from).transpose()
    }

    /// Get a feed by URL.
    pub async fn get_by_url(&self, url: &str) -> Result<Option<Feed>> {
        let query = format!("SELECT {FEED_COLUMNS} FROM feeds WHERE url = ?");
        let row = sqlx::query_as::<_, FeedRow>(&query)
            .bind(url)
            .fetch_optional(self.pool)
            .await?;

        row.map(Feed::try_from).transpose()
    }

    /// List all feeds in registration order.
    pub async fn list_all(&self) -> Result<Vec<Feed>> {
        let query = format!("SELECT {FEED_COLUMNS} FROM feeds ORDER BY created_at ASC, id ASC");
        let rows = sqlx::query_as::<_, FeedRow>(&query)
            .fetch_all(self.pool)
            .await?;

        collect(rows)
    }

    /// List up to `limit` feeds, never-fetched first, then least recently fetched.
    pub async fn next_to_fetch(&self, limit: i64) -> Result<Vec<Feed>> {
        let query = format!(
            "SELECT {FEED_COLUMNS} FROM feeds
             ORDER BY last_fetched_at ASC NULLS FIRST, created_at ASC, id ASC
             LIMIT ?"
        );
        let rows = sqlx::query_as::<_, FeedRow>(&query)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;

        collect(rows)
    }

    /// Stamp the feed as fetched now.
    pub async fn mark_fetched(&self, id: Uuid) -> Result<Option<Feed>> {
        self.mark_fetched_at(id, now()).await
    }

    /// Stamp the feed as fetched at the given time.
    pub async fn mark_fetched_at(&self, id: Uuid, at: DateTime<Utc>) -> Result<Option<Feed>> {
        let ts = format_timestamp(&at);
        let query = format!(
            "UPDATE feeds SET last_fetched_at = ?, updated_at = ? WHERE id = ?
             RETURNING {FEED_COLUMNS}"
        );
        let row = sqlx::query_as::<_, FeedRow>(&query)
            .bind(&ts)
            .bind(&ts)
            .bind(id.to_string())
            .fetch_optional(self.pool)
            .await?;

        row.map(Feed::try_from).transpose()
    }

    /// Delete a feed. Its posts and follows cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM feeds WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Repository for feed follow operations.
pub struct FeedFollowRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FeedFollowRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Follow a feed. Following the same feed twice yields `Duplicate`.
    pub async fn create(&self, user_id: Uuid, feed_id: Uuid) -> Result<FeedFollow> {
        let id = Uuid::new_v4();
        let ts = format_timestamp(&now());

        let row = sqlx::query_as::<_, FeedFollowRow>(
            "INSERT INTO feed_follows (id, user_id, feed_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id, user_id, feed_id, created_at, updated_at",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(feed_id.to_string())
        .bind(&ts)
        .bind(&ts)
        .fetch_one(self.pool)
        .await?;

        FeedFollow::try_from(row)
    }

    /// List a user's follows, oldest first.
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<FeedFollow>> {
        let rows = sqlx::query_as::<_, FeedFollowRow>(
            "SELECT id, user_id, feed_id, created_at, updated_at
             FROM feed_follows
             WHERE user_id = ?
             ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool)
        .await?;

        collect(rows)
    }

    /// Delete a follow owned by the given user.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM feed_follows WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Repository for post operations.
pub struct PostRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PostRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a post as given. An existing URL yields `Duplicate`.
    pub async fn insert(&self, post: &Post) -> Result<()> {
        sqlx::query(
            "INSERT INTO posts (id, feed_id, title, url, description, published_at,
                                created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(post.id.to_string())
        .bind(post.feed_id.to_string())
        .bind(&post.title)
        .bind(&post.url)
        .bind(&post.description)
        .bind(format_timestamp(&post.published_at))
        .bind(format_timestamp(&post.created_at))
        .bind(format_timestamp(&post.updated_at))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Get a post by URL.
    pub async fn get_by_url(&self, url: &str) -> Result<Option<Post>> {
        let query = format!("SELECT {POST_COLUMNS} FROM posts WHERE url = ?");
        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(url)
            .fetch_optional(self.pool)
            .await?;

        row.map(Post::try_from).transpose()
    }

    /// List the newest posts from feeds the user follows.
    pub async fn list_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT p.id, p.feed_id, p.title, p.url, p.description, p.published_at,
                    p.created_at, p.updated_at
             FROM posts p
             JOIN feed_follows f ON f.feed_id = p.feed_id
             WHERE f.user_id = ?
             ORDER BY p.published_at DESC, p.id ASC
             LIMIT ?",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        collect(rows)
    }

    /// Count a feed's posts.
    pub async fn count_by_feed(&self, feed_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE feed_id = ?")
            .bind(feed_id.to_string())
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Count all posts.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
