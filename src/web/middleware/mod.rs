//! Request extractors and layers.

pub mod auth;
pub mod cors;

pub use auth::{get_api_key, AuthUser};
pub use cors::create_cors_layer;
