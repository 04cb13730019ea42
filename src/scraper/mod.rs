//! Feed scraper.
//!
//! A fixed-interval scheduler claims stale feeds, fetches them concurrently
//! and stores their new items.
//!
//! ```text
//! Scheduler -> Claimer -> per feed: Fetcher -> Normalizer -> Ingester -> FeedStore
//! ```

pub mod claimer;
pub mod document;
pub mod fetcher;
pub mod ingester;
pub mod normalizer;
pub mod scheduler;
pub mod store;

pub use claimer::Claimer;
pub use document::{parse_document, Channel, FeedDocument, RawItem};
pub use fetcher::{FeedFetcher, HttpFetcher, DEFAULT_FETCH_TIMEOUT, MAX_FEED_SIZE};
pub use ingester::{ingest, IngestReport};
pub use normalizer::{normalize_item, normalize_items, parse_pub_date, CandidatePost, DropReason};
pub use scheduler::{scrape_feed, start_scheduler, Scheduler, TickReport};
pub use store::FeedStore;
