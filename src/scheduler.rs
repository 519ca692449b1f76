//! Periodic driver for [`TickerRenderer::refresh`].
//!
//! One refresh runs immediately on start, then one per interval until stopped.
//! Refreshes are serialized: the loop awaits each one before waiting for the
//! next tick, and ticks missed behind a slow refresh are delayed rather than
//! replayed in a burst. A failed refresh is logged and the schedule continues.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::constants::REFRESH_INTERVAL_SECS;
use crate::error::RefreshError;
use crate::logging;
use crate::renderer::{RefreshOutcome, TickerRenderer};
use crate::shutdown::{self, ShutdownSignal};

#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    pub interval: Duration,
    /// Stop after this many refresh attempts.
    pub max_refreshes: Option<usize>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(REFRESH_INTERVAL_SECS),
            max_refreshes: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    pub attempts: usize,
    pub failures: usize,
}

pub struct RefreshScheduler {
    config: SchedulerConfig,
}

impl RefreshScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Spawn the refresh loop with its own stop channel.
    pub fn start(self, renderer: Arc<TickerRenderer>) -> SchedulerHandle {
        let (stop_tx, stop_rx) = shutdown::channel();
        let task = tokio::spawn(run_refresh_loop(self.config, renderer, stop_rx));
        SchedulerHandle { stop_tx, task }
    }
}

pub struct SchedulerHandle {
    stop_tx: watch::Sender<ShutdownSignal>,
    task: JoinHandle<RefreshStats>,
}

impl SchedulerHandle {
    /// Let any in-flight refresh complete, then stop the loop.
    pub async fn stop(self) -> Result<RefreshStats> {
        self.stop_with(ShutdownSignal::Graceful).await
    }

    /// Stop the loop; `Immediate` drops an in-flight refresh instead of
    /// waiting for it.
    pub async fn stop_with(self, signal: ShutdownSignal) -> Result<RefreshStats> {
        let _ = self.stop_tx.send(signal);
        self.task.await.context("refresh loop panicked")
    }

    /// Wait for the loop to end on its own (only happens with `max_refreshes`).
    pub async fn join(self) -> Result<RefreshStats> {
        self.task.await.context("refresh loop panicked")
    }
}

/// Refresh loop bound to an externally owned shutdown channel.
pub async fn run_refresh_loop(
    config: SchedulerConfig,
    renderer: Arc<TickerRenderer>,
    mut shutdown: watch::Receiver<ShutdownSignal>,
) -> RefreshStats {
    let mut ticker = time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut stats = RefreshStats::default();
    logging::info(
        "scheduler.start",
        "Ticker refresh loop started",
        json!({
            "source": renderer.source().describe(),
            "interval_ms": config.interval.as_millis() as u64,
        }),
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown::requested(&mut shutdown) => break,
        }

        stats.attempts += 1;
        let refresh = renderer.refresh();
        tokio::pin!(refresh);
        let outcome = tokio::select! {
            outcome = &mut refresh => outcome,
            signal = shutdown::requested(&mut shutdown) => {
                if signal == ShutdownSignal::Immediate {
                    logging::warn_simple("scheduler.cancel", "In-flight refresh dropped on shutdown");
                    break;
                }
                let outcome = refresh.await;
                log_outcome(&outcome, &mut stats);
                break;
            }
        };
        log_outcome(&outcome, &mut stats);

        if config
            .max_refreshes
            .is_some_and(|max| stats.attempts >= max)
        {
            break;
        }
    }

    logging::info(
        "scheduler.stop",
        "Ticker refresh loop stopped",
        json!({ "attempts": stats.attempts, "failures": stats.failures }),
    );
    stats
}

fn log_outcome(outcome: &Result<RefreshOutcome, RefreshError>, stats: &mut RefreshStats) {
    match outcome {
        Ok(done) => logging::info(
            "refresh.rendered",
            "Ticker strip rendered",
            json!({ "symbols": done.symbols, "bytes": done.markup_bytes }),
        ),
        Err(err) => {
            stats.failures += 1;
            logging::warn(
                "refresh.failed",
                "Ticker refresh failed; keeping previous content",
                json!({ "kind": err.kind(), "error": err.to_string() }),
            );
        }
    }
}
