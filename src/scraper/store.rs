//! Store capability used by the scraper.

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::Database;
use crate::feed::{Feed, FeedRepository, Post, PostRepository};
use crate::{AggregatorError, Result};

/// What the scheduler needs from persistent storage.
///
/// Implementations must tolerate concurrent calls from every worker of a
/// batch without external locking.
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Up to `limit` feeds, never-fetched first, then least recently fetched.
    async fn claim_next(&self, limit: usize) -> Result<Vec<Feed>>;

    /// Stamp a feed's last-fetched time with the current time.
    async fn mark_fetched(&self, feed_id: Uuid) -> Result<Feed>;

    /// Insert a post. A post with the same URL yields `AggregatorError::Duplicate`.
    async fn insert_post(&self, post: &Post) -> Result<()>;
}

#[async_trait]
impl FeedStore for Database {
    async fn claim_next(&self, limit: usize) -> Result<Vec<Feed>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        FeedRepository::new(self.pool()).next_to_fetch(limit).await
    }

    async fn mark_fetched(&self, feed_id: Uuid) -> Result<Feed> {
        FeedRepository::new(self.pool())
            .mark_fetched(feed_id)
            .await?
            .ok_or_else(|| AggregatorError::NotFound(format!("feed {feed_id}")))
    }

    async fn insert_post(&self, post: &Post) -> Result<()> {
        PostRepository::new(self.pool()).insert(post).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::now;
    use crate::db::{NewUser, UserRepository};
    use crate::feed::NewFeed;

    async fn setup() -> (Database, Uuid) {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserRepository::new(db.pool())
            .create(&NewUser::new("store"))
            .await
            .unwrap();
        (db, user.id)
    }

    #[tokio::test]
    async fn test_claim_next_respects_limit() {
        let (db, user_id) = setup().await;
        let repo = FeedRepository::new(db.pool());
        for i in 0..5 {
            repo.create(&NewFeed::new("f", format!("https://example.com/{i}.xml"), user_id))
                .await
                .unwrap();
        }

        assert_eq!(db.claim_next(3).await.unwrap().len(), 3);
        assert_eq!(db.claim_next(10).await.unwrap().len(), 5);
        assert!(db.claim_next(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_fetched_unknown_feed() {
        let (db, _) = setup().await;

        let result = FeedStore::mark_fetched(&db, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AggregatorError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mark_fetched_is_idempotent() {
        let (db, user_id) = setup().await;
        let feed = FeedRepository::new(db.pool())
            .create(&NewFeed::new("f", "https://example.com/feed.xml", user_id))
            .await
            .unwrap();

        let first = FeedStore::mark_fetched(&db, feed.id).await.unwrap();
        let second = FeedStore::mark_fetched(&db, feed.id).await.unwrap();

        assert!(first.last_fetched_at.is_some());
        assert!(second.last_fetched_at >= first.last_fetched_at);
    }

    #[tokio::test]
    async fn test_insert_post_duplicate() {
        let (db, user_id) = setup().await;
        let feed = FeedRepository::new(db.pool())
            .create(&NewFeed::new("f", "https://example.com/feed.xml", user_id))
            .await
            .unwrap();

        let ts = now();
        let post = Post {
            id: Uuid::new_v4(),
            feed_id: feed.id,
            title: "t".to_string(),
            url: "https://example.com/p".to_string(),
            description: None,
            published_at: ts,
            created_at: ts,
            updated_at: ts,
        };

        db.insert_post(&post).await.unwrap();
        let again = Post {
            id: Uuid::new_v4(),
            ..post
        };
        let err = db.insert_post(&again).await.unwrap_err();
        assert!(err.is_duplicate());
    }
}
