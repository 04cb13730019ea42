//! HTTP API.
//!
//! User registration, feed registration, follows and the posts timeline,
//! all under `/v1`. Authenticated routes take `Authorization: ApiKey <key>`.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
