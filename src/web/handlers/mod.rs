//! HTTP API handlers.

pub mod feed;
pub mod follow;
pub mod health;
pub mod post;
pub mod user;

pub use feed::{create_feed, list_feeds};
pub use follow::{create_feed_follow, delete_feed_follow, list_feed_follows};
pub use health::{error, readiness};
pub use post::list_posts;
pub use user::{create_user, get_user};

use crate::Database;

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}
