//! Feed fetcher.
//!
//! Performs one bounded-timeout HTTP GET per feed and decodes the body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::document::{parse_document, FeedDocument};
use crate::{AggregatorError, Result};

/// Default total timeout for one feed request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum feed size in bytes (5MB).
pub const MAX_FEED_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// User agent string for feed fetching.
const USER_AGENT: &str = concat!("rss-aggregator/", env!("CARGO_PKG_VERSION"));

/// Source of feed documents.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Retrieve and decode the document at `url`.
    ///
    /// Transport errors, non-success statuses and undecodable bodies all
    /// surface as `AggregatorError::Fetch`.
    async fn fetch(&self, url: &str) -> Result<FeedDocument>;
}

/// HTTP feed fetcher sharing one client across all workers.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher with the default 10 second timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a fetcher with a custom total request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AggregatorError::Fetch(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FeedDocument> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AggregatorError::Fetch(format!("failed to fetch feed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AggregatorError::Fetch(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > MAX_FEED_SIZE {
                return Err(AggregatorError::Fetch(format!(
                    "feed too large: {} bytes (max {} bytes)",
                    content_length, MAX_FEED_SIZE
                )));
            }
        }

        // Chunked responses carry no content length, so count while reading
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AggregatorError::Fetch(format!("failed to read response: {}", e)))?
        {
            if (body.len() + chunk.len()) as u64 > MAX_FEED_SIZE {
                return Err(AggregatorError::Fetch(format!(
                    "feed too large: more than {} bytes",
                    MAX_FEED_SIZE
                )));
            }
            body.extend_from_slice(&chunk);
        }

        parse_document(&body)
    }
}
