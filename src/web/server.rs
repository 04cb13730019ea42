//! HTTP server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::{AggregatorError, Database, Result};

use super::handlers::AppState;
use super::router::create_router;

/// HTTP server for the `/v1` API.
pub struct WebServer {
    addr: SocketAddr,
    app_state: Arc<AppState>,
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a server from configuration.
    ///
    /// Fails if the listen address or any CORS origin is invalid.
    pub fn new(config: &ServerConfig, db: Database) -> Result<Self> {
        if let Some(origin) = config
            .cors_origins
            .iter()
            .find(|o| HeaderValue::from_str(o).is_err())
        {
            return Err(AggregatorError::Config(format!(
                "invalid CORS origin: {origin:?}"
            )));
        }

        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| {
                AggregatorError::Config(format!(
                    "invalid server address {}:{}: {}",
                    config.host, config.port, e
                ))
            })?;

        Ok(Self {
            addr,
            app_state: Arc::new(AppState::new(db)),
            cors_origins: config.cors_origins.clone(),
        })
    }

    /// The configured listen address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve until `shutdown` completes, then drain in-flight requests.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = create_router(self.app_state, &self.cors_origins);

        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Web server stopped");
        Ok(())
    }

    /// Bind, serve in the background and return the bound address.
    ///
    /// Useful with port 0 in tests.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = create_router(self.app_state, &self.cors_origins);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec![],
        }
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let db = Database::open_in_memory().await.unwrap();

        let server = WebServer::new(&test_config(), db).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_web_server_invalid_host() {
        let db = Database::open_in_memory().await.unwrap();
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..test_config()
        };

        let result = WebServer::new(&config, db);
        assert!(matches!(result, Err(AggregatorError::Config(_))));
    }

    #[tokio::test]
    async fn test_web_server_invalid_cors_origin() {
        let db = Database::open_in_memory().await.unwrap();
        let config = ServerConfig {
            cors_origins: vec![
                "https://ok.example.com".to_string(),
                "bad\norigin".to_string(),
            ],
            ..test_config()
        };

        let result = WebServer::new(&config, db);
        assert!(matches!(result, Err(AggregatorError::Config(_))));
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let db = Database::open_in_memory().await.unwrap();

        let server = WebServer::new(&test_config(), db).unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let resp = reqwest::Client::new()
            .get(format!("http://{}/v1/healthz", addr))
            .send()
            .await
            .unwrap();

        assert!(resp.status().is_success());
        assert_eq!(resp.text().await.unwrap(), "{}");
    }
}
