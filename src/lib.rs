//! rss-aggregator - RSS feed aggregation service
//!
//! A background scraper periodically claims the least recently fetched
//! feeds, fetches them concurrently and stores their items as posts. An HTTP
//! API lets users register feeds, follow them and read the newest posts.

pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod feed;
pub mod logging;
pub mod scraper;
pub mod web;

pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{AggregatorError, Result};
pub use feed::{Feed, FeedFollow, NewFeed, Post};
pub use scraper::{FeedFetcher, FeedStore, HttpFetcher, Scheduler, TickReport};
pub use web::WebServer;
