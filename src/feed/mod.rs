//! Feeds, follows and posts.
//!
//! This module holds the stored records and their repositories.

pub mod repository;
pub mod types;

pub use repository::{FeedFollowRepository, FeedRepository, PostRepository};
pub use types::{Feed, FeedFollow, NewFeed, Post, DEFAULT_POSTS_LIMIT, MAX_POSTS_LIMIT};
