//! Fixed-interval scrape scheduler.
//!
//! Each tick claims a batch of feeds and runs one worker per feed
//! (fetch, normalize, ingest). The batch is a barrier: the next tick is not
//! acted on until every worker of the current batch has finished.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::claimer::Claimer;
use super::fetcher::FeedFetcher;
use super::ingester::{ingest, IngestReport};
use super::normalizer::normalize_items;
use super::store::FeedStore;
use crate::config::ScraperConfig;
use crate::feed::Feed;
use crate::Result;

/// Default tick interval (1 minute).
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Shortest accepted tick interval.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Default number of feeds claimed per tick.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Summary of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Feeds claimed for this tick.
    pub claimed: usize,
    /// Feeds fetched and ingested.
    pub completed: usize,
    /// Feeds whose fetch failed or whose worker panicked.
    pub failed: usize,
    /// Posts newly stored.
    pub posts_created: usize,
    /// Items already stored.
    pub duplicates: usize,
    /// Wall time of the tick.
    pub elapsed: Duration,
}

impl TickReport {
    fn record(&mut self, ingested: IngestReport) {
        self.completed += 1;
        self.posts_created += ingested.inserted;
        self.duplicates += ingested.duplicates;
    }
}

/// Background scrape scheduler.
#[derive(Clone)]
pub struct Scheduler {
    store: Arc<dyn FeedStore>,
    fetcher: Arc<dyn FeedFetcher>,
    claimer: Claimer,
    interval: Duration,
    concurrency: usize,
}

impl Scheduler {
    /// Create a scheduler with the default interval and concurrency.
    pub fn new(store: Arc<dyn FeedStore>, fetcher: Arc<dyn FeedFetcher>) -> Self {
        Self {
            claimer: Claimer::new(Arc::clone(&store)),
            store,
            fetcher,
            interval: DEFAULT_INTERVAL,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Create a scheduler from configuration.
    pub fn from_config(
        config: &ScraperConfig,
        store: Arc<dyn FeedStore>,
        fetcher: Arc<dyn FeedFetcher>,
    ) -> Self {
        Self::new(store, fetcher)
            .with_interval(config.interval())
            .with_concurrency(config.concurrency)
    }

    /// Set the tick interval. Clamped to at least [`MIN_INTERVAL`].
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    /// Set the maximum number of feeds per tick. Clamped to at least one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// The tick interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The maximum number of feeds per tick.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run the scheduler loop until `shutdown` completes.
    ///
    /// The first tick fires immediately. A tick that outlasts the interval
    /// delays the following ones; it never overlaps them. Shutdown is
    /// observed between ticks, so an in-progress batch always completes.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            "Scraper started (interval: {}s, concurrency: {})",
            self.interval.as_secs_f64(),
            self.concurrency
        );

        let mut timer = interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Scraper stopped");
                    break;
                }
                _ = timer.tick() => {
                    if let Some(report) = self.run_tick().await {
                        if report.elapsed > self.interval {
                            warn!(
                                "Scrape batch took {:?}, longer than the {:?} interval",
                                report.elapsed, self.interval
                            );
                        }
                    }
                }
            }
        }
    }

    /// Run a single tick: claim a batch and wait for all of its workers.
    ///
    /// Returns `None` when the claim itself failed and the tick was skipped.
    pub async fn run_tick(&self) -> Option<TickReport> {
        let started = Instant::now();

        let feeds = match self.claimer.claim(self.concurrency).await {
            Ok(feeds) => feeds,
            Err(e) => {
                error!("Failed to claim feeds, skipping tick: {}", e);
                return None;
            }
        };

        let mut report = TickReport {
            claimed: feeds.len(),
            ..TickReport::default()
        };

        if feeds.is_empty() {
            debug!("No feeds to scrape");
            report.elapsed = started.elapsed();
            return Some(report);
        }

        debug!("Scraping {} feed(s)", feeds.len());

        let mut workers = JoinSet::new();
        for feed in feeds {
            let store = Arc::clone(&self.store);
            let fetcher = Arc::clone(&self.fetcher);
            workers.spawn(async move {
                scrape_feed(store.as_ref(), fetcher.as_ref(), &feed).await
            });
        }

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Ok(ingested)) => report.record(ingested),
                Ok(Err(_)) => report.failed += 1,
                Err(e) => {
                    error!("Feed worker panicked: {}", e);
                    report.failed += 1;
                }
            }
        }

        report.elapsed = started.elapsed();
        info!(
            claimed = report.claimed,
            completed = report.completed,
            failed = report.failed,
            posts = report.posts_created,
            duplicates = report.duplicates,
            "Scrape tick finished in {:?}",
            report.elapsed
        );

        Some(report)
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("interval", &self.interval)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

/// Fetch one feed and ingest its items.
///
/// Only a fetch failure is returned as an error; item-level problems are
/// absorbed by the normalizer and the ingester.
pub async fn scrape_feed(
    store: &dyn FeedStore,
    fetcher: &dyn FeedFetcher,
    feed: &Feed,
) -> Result<IngestReport> {
    let document = match fetcher.fetch(&feed.url).await {
        Ok(document) => document,
        Err(e) => {
            warn!(feed = %feed.url, "Failed to fetch feed: {}", e);
            return Err(e);
        }
    };

    let candidates = normalize_items(&document.channel.items);
    let dropped = document.channel.items.len() - candidates.len();
    let ingested = ingest(store, feed, candidates).await;

    if ingested.inserted > 0 {
        info!(
            feed = %feed.url,
            "Feed {} updated: {} new post(s)", feed.name, ingested.inserted
        );
    } else {
        debug!(
            feed = %feed.url,
            dropped,
            duplicates = ingested.duplicates,
            "Feed {} updated: no new posts", feed.name
        );
    }

    Ok(ingested)
}

/// Start the scheduler as a background task.
///
/// The task stops once `shutdown` reads `true` or its sender is dropped. A
/// batch already running is allowed to finish, so await the handle to drain.
pub fn start_scheduler(
    scheduler: Scheduler,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        scheduler
            .run_until(async move {
                let _ = shutdown.wait_for(|stop| *stop).await;
            })
            .await;
    })
}
