//! Claim selection.
//!
//! A claimed feed is stamped as fetched before any network activity, so a
//! feed whose fetch fails moves to the back of the claim order instead of
//! being retried on the next tick.

use std::sync::Arc;

use tracing::warn;

use super::store::FeedStore;
use crate::feed::Feed;
use crate::Result;

/// Selects and stamps the feeds due for refresh.
#[derive(Clone)]
pub struct Claimer {
    store: Arc<dyn FeedStore>,
}

impl Claimer {
    /// Create a claimer over the given store.
    pub fn new(store: Arc<dyn FeedStore>) -> Self {
        Self { store }
    }

    /// Claim up to `limit` feeds and stamp each as fetched.
    ///
    /// A store failure while selecting fails the whole claim. A feed that
    /// cannot be stamped is left out of the batch.
    pub async fn claim(&self, limit: usize) -> Result<Vec<Feed>> {
        let mut feeds = self.store.claim_next(limit).await?;
        feeds.truncate(limit);

        let mut claimed = Vec::with_capacity(feeds.len());
        for feed in feeds {
            match self.store.mark_fetched(feed.id).await {
                Ok(stamped) => claimed.push(stamped),
                Err(e) => warn!(feed = %feed.url, "Failed to mark feed as fetched: {}", e),
            }
        }

        Ok(claimed)
    }
}

impl std::fmt::Debug for Claimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Claimer").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::now;
    use crate::db::{NewUser, UserRepository};
    use crate::feed::{FeedRepository, NewFeed, Post};
    use crate::{AggregatorError, Database};
    use async_trait::async_trait;
    use chrono::Duration;
    use uuid::Uuid;

    async fn setup() -> (Database, Uuid) {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserRepository::new(db.pool())
            .create(&NewUser::new("claimer"))
            .await
            .unwrap();
        (db, user.id)
    }

    #[tokio::test]
    async fn test_claim_prefers_never_then_oldest() {
        let (db, user_id) = setup().await;
        let repo = FeedRepository::new(db.pool());

        let c = repo
            .create(&NewFeed::new("C", "https://example.com/c.xml", user_id))
            .await
            .unwrap();
        let b = repo
            .create(&NewFeed::new("B", "https://example.com/b.xml", user_id))
            .await
            .unwrap();
        let a = repo
            .create(&NewFeed::new("A", "https://example.com/a.xml", user_id))
            .await
            .unwrap();
        repo.mark_fetched_at(b.id, now() - Duration::hours(1))
            .await
            .unwrap();
        repo.mark_fetched_at(c.id, now() - Duration::minutes(5))
            .await
            .unwrap();

        let claimer = Claimer::new(Arc::new(db.clone()));
        let ids: Vec<_> = claimer.claim(2).await.unwrap().iter().map(|f| f.id).collect();

        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_claim_stamps_feeds() {
        let (db, user_id) = setup().await;
        let repo = FeedRepository::new(db.pool());
        let feed = repo
            .create(&NewFeed::new("F", "https://example.com/f.xml", user_id))
            .await
            .unwrap();
        let before = now();

        let claimed = Claimer::new(Arc::new(db.clone())).claim(5).await.unwrap();

        assert_eq!(claimed.len(), 1);
        let stored = repo.get_by_id(feed.id).await.unwrap().unwrap();
        let stamped = stored.last_fetched_at.expect("feed should be stamped");
        assert!(stamped >= before);
        assert_eq!(claimed[0].last_fetched_at, Some(stamped));
    }

    #[tokio::test]
    async fn test_claim_rotates_through_feeds() {
        let (db, user_id) = setup().await;
        let repo = FeedRepository::new(db.pool());
        for name in ["one", "two", "three"] {
            repo.create(&NewFeed::new(name, format!("https://example.com/{name}.xml"), user_id))
                .await
                .unwrap();
        }
        let claimer = Claimer::new(Arc::new(db.clone()));

        let first = claimer.claim(2).await.unwrap();
        let second = claimer.claim(2).await.unwrap();

        assert_eq!(first.len(), 2);
        let left_out = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .find(|f| first.iter().all(|c| c.id != f.id))
            .unwrap();
        // The feed left out was never fetched, so it leads the next claim
        assert_eq!(second[0].id, left_out.id);
    }

    /// Store returning more rows than asked and refusing to stamp one feed.
    struct UnrulyStore {
        feeds: Vec<Feed>,
        unstampable: Uuid,
    }

    #[async_trait]
    impl FeedStore for UnrulyStore {
        async fn claim_next(&self, _limit: usize) -> Result<Vec<Feed>> {
            Ok(self.feeds.clone())
        }

        async fn mark_fetched(&self, feed_id: Uuid) -> Result<Feed> {
            if feed_id == self.unstampable {
                return Err(AggregatorError::Database("locked".to_string()));
            }
            let mut feed = self
                .feeds
                .iter()
                .find(|f| f.id == feed_id)
                .cloned()
                .ok_or_else(|| AggregatorError::NotFound("feed".to_string()))?;
            feed.last_fetched_at = Some(now());
            Ok(feed)
        }

        async fn insert_post(&self, _post: &Post) -> Result<()> {
            Ok(())
        }
    }

    fn feed(name: &str) -> Feed {
        let ts = now();
        Feed {
            id: Uuid::new_v4(),
            name: name.to_string(),
            url: format!("https://example.com/{name}.xml"),
            user_id: Uuid::new_v4(),
            last_fetched_at: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[tokio::test]
    async fn test_claim_never_exceeds_limit() {
        let feeds: Vec<_> = ["a", "b", "c", "d"].into_iter().map(feed).collect();
        let store = UnrulyStore {
            feeds: feeds.clone(),
            unstampable: Uuid::new_v4(),
        };

        let claimed = Claimer::new(Arc::new(store)).claim(2).await.unwrap();

        assert_eq!(claimed.len(), 2);
        assert_eq!(claimed[0].id, feeds[0].id);
        assert_eq!(claimed[1].id, feeds[1].id);
    }

    #[tokio::test]
    async fn test_claim_drops_unstampable_feed() {
        let feeds: Vec<_> = ["a", "b", "c"].into_iter().map(feed).collect();
        let store = UnrulyStore {
            feeds: feeds.clone(),
            unstampable: feeds[1].id,
        };

        let claimed = Claimer::new(Arc::new(store)).claim(3).await.unwrap();

        let ids: Vec<_> = claimed.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![feeds[0].id, feeds[2].id]);
        assert!(claimed.iter().all(|f| f.last_fetched_at.is_some()));
    }
}
