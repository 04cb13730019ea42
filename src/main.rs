use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};

use rss_aggregator::scraper::start_scheduler;
use rss_aggregator::{Config, Database, HttpFetcher, Scheduler, WebServer};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional
    let _ = dotenvy::dotenv();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let (mut config, load_error) = match Config::load(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    if let Err(e) = rss_aggregator::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        rss_aggregator::logging::init_console_only(&config.logging.level);
    }

    if let Some(e) = load_error {
        warn!("Failed to load {}: {}. Using default configuration.", config_path, e);
    }
    // After logging so override warnings are not lost
    config.apply_env_overrides();

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    info!("rss-aggregator {}", env!("CARGO_PKG_VERSION"));

    let db = match Database::open(&config.database.path, config.database.max_connections).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database {}: {}", config.database.path, e);
            return ExitCode::FAILURE;
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scraper = if config.scraper.enabled {
        let fetcher = match HttpFetcher::with_timeout(config.scraper.fetch_timeout()) {
            Ok(fetcher) => fetcher,
            Err(e) => {
                error!("Failed to create feed fetcher: {}", e);
                return ExitCode::FAILURE;
            }
        };
        let scheduler =
            Scheduler::from_config(&config.scraper, Arc::new(db.clone()), Arc::new(fetcher));
        Some(start_scheduler(scheduler, shutdown_rx))
    } else {
        info!("Scraper disabled");
        None
    };

    let server = match WebServer::new(&config.server, db.clone()) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = server.run_until(shutdown_signal()).await;

    let _ = shutdown_tx.send(true);
    if let Some(handle) = scraper {
        info!("Waiting for the current scrape batch to finish");
        if let Err(e) = handle.await {
            error!("Scraper task failed: {}", e);
        }
    }
    db.close().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Web server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
