//! Post ingester.

use tracing::{debug, error};
use uuid::Uuid;

use super::normalizer::CandidatePost;
use super::store::FeedStore;
use crate::datetime::now;
use crate::feed::{Feed, Post};

/// Outcome of ingesting one document's candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Posts newly stored.
    pub inserted: usize,
    /// Candidates whose URL was already stored.
    pub duplicates: usize,
    /// Candidates skipped because of a store error.
    pub failed: usize,
}

/// Insert candidates for `feed` in document order.
///
/// An existing URL is a no-op. Any other store error is logged and only that
/// candidate is skipped.
pub async fn ingest(
    store: &dyn FeedStore,
    feed: &Feed,
    candidates: Vec<CandidatePost>,
) -> IngestReport {
    let mut report = IngestReport::default();

    for candidate in candidates {
        let ts = now();
        let post = Post {
            id: Uuid::new_v4(),
            feed_id: feed.id,
            title: candidate.title,
            url: candidate.url,
            description: candidate.description,
            published_at: candidate.published_at,
            created_at: ts,
            updated_at: ts,
        };

        match store.insert_post(&post).await {
            Ok(()) => report.inserted += 1,
            Err(e) if e.is_duplicate() => {
                debug!(feed = %feed.url, url = %post.url, "Post already stored");
                report.duplicates += 1;
            }
            Err(e) => {
                error!(feed = %feed.url, url = %post.url, "Failed to store post: {}", e);
                report.failed += 1;
            }
        }
    }

    report
}
