mod feed;
mod logos;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::RwLock;
use serde_json::json;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::constants::{LOGO_DIR, PUBLISH_INTERVAL_SECS};
use crate::logging;
use crate::quote::{Quote, QuoteSnapshot};
use crate::shutdown::{self, ShutdownSignal};
use crate::watchlist::Watchlist;

pub use feed::{QuoteFeed, SimulatedFeed};
pub use logos::{company_domain, LogoFetcher};

#[derive(Clone, Debug)]
pub struct PublisherConfig {
    pub interval: Duration,
    /// URL prefix written into each quote's `logo` field.
    pub logo_prefix: String,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(PUBLISH_INTERVAL_SECS),
            logo_prefix: LOGO_DIR.to_string(),
        }
    }
}

/// Latest published snapshot, shared with the HTTP server.
#[derive(Clone, Default)]
pub struct SnapshotStore {
    latest: Arc<RwLock<QuoteSnapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> QuoteSnapshot {
        self.latest.read().clone()
    }

    pub fn replace(&self, snapshot: QuoteSnapshot) {
        *self.latest.write() = snapshot;
    }
}

/// Builds a fresh snapshot for every symbol on the watchlist, in watchlist
/// order, from the two most recent closes the feed reports.
pub struct QuotePublisher<F> {
    config: PublisherConfig,
    feed: F,
    watchlist: Watchlist,
    store: SnapshotStore,
    logos: Option<LogoFetcher>,
}

impl<F: QuoteFeed> QuotePublisher<F> {
    pub fn new(config: PublisherConfig, feed: F, watchlist: Watchlist, store: SnapshotStore) -> Self {
        Self {
            config,
            feed,
            watchlist,
            store,
            logos: None,
        }
    }

    /// Cache missing logos after every publish.
    pub fn with_logos(mut self, logos: LogoFetcher) -> Self {
        self.logos = Some(logos);
        self
    }

    pub fn build_snapshot(&mut self) -> QuoteSnapshot {
        self.watchlist
            .symbols()
            .into_iter()
            .map(|symbol| {
                let quote = self.quote_for(&symbol);
                (symbol, quote)
            })
            .collect()
    }

    fn quote_for(&mut self, symbol: &str) -> Quote {
        let logo = format!("{}/{symbol}.png", self.config.logo_prefix);
        let closes = self.feed.closes(symbol);
        match closes.as_slice() {
            [.., previous, current] => Quote::from_closes(*previous, *current, logo),
            _ => {
                logging::warn(
                    "publisher.no_data",
                    "Not enough closes to quote symbol",
                    json!({ "symbol": symbol, "closes": closes.len() }),
                );
                Quote::unavailable(logo)
            }
        }
    }

    pub fn publish_once(&mut self) -> usize {
        let snapshot = self.build_snapshot();
        let published = snapshot.len();
        self.store.replace(snapshot);
        published
    }

    fn publish_and_log(&mut self) {
        let published = self.publish_once();
        logging::info(
            "publisher.publish",
            "Published quote snapshot",
            json!({ "symbols": published }),
        );
    }

    /// Publish before the first await, then once per interval until shutdown.
    pub async fn run(mut self, mut shutdown: watch::Receiver<ShutdownSignal>) -> Result<()> {
        self.publish_and_log();
        let period = self.config.interval;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            if let Some(logos) = &self.logos {
                let symbols = self.watchlist.symbols();
                tokio::select! {
                    _ = logos.ensure_all(&symbols) => {}
                    _ = shutdown::requested(&mut shutdown) => break,
                }
            }

            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown::requested(&mut shutdown) => break,
            }
            self.publish_and_log();
        }

        logging::info_simple("publisher.stop", "Quote publisher stopped");
        Ok(())
    }
}
