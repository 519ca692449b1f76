use anyhow::{Context, Result};
use serde_json::json;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::logging;

/// Broadcast over a `watch` channel to every long-running task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownSignal {
    None,
    /// Let in-flight work finish, then stop.
    Graceful,
    /// Drop in-flight work and stop.
    Immediate,
}

impl ShutdownSignal {
    pub fn is_requested(self) -> bool {
        !matches!(self, ShutdownSignal::None)
    }
}

pub fn channel() -> (watch::Sender<ShutdownSignal>, watch::Receiver<ShutdownSignal>) {
    watch::channel(ShutdownSignal::None)
}

/// Resolves once shutdown has been requested or every sender is gone.
pub async fn requested(shutdown: &mut watch::Receiver<ShutdownSignal>) -> ShutdownSignal {
    loop {
        let current = *shutdown.borrow_and_update();
        if current.is_requested() {
            return current;
        }
        if shutdown.changed().await.is_err() {
            return ShutdownSignal::Immediate;
        }
    }
}

/// SIGTERM asks for a graceful stop, SIGINT for an immediate one.
pub async fn handle_signals(shutdown_tx: watch::Sender<ShutdownSignal>) -> Result<()> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to register SIGTERM handler")?;
    let mut sigint =
        signal(SignalKind::interrupt()).context("failed to register SIGINT handler")?;

    let requested = tokio::select! {
        _ = sigterm.recv() => ("SIGTERM", ShutdownSignal::Graceful),
        _ = sigint.recv() => ("SIGINT", ShutdownSignal::Immediate),
    };

    logging::info(
        "signal.received",
        "Shutdown signal received",
        json!({ "signal": requested.0 }),
    );
    let _ = shutdown_tx.send(requested.1);
    Ok(())
}

/// Stop the signal task and report why it ended. A handler that could not
/// register drops its sender, which every receiver reads as `Immediate`, so
/// that error has to come back out here.
pub async fn finish_signals(task: JoinHandle<Result<()>>) -> Result<()> {
    task.abort();
    match task.await {
        Ok(outcome) => outcome,
        Err(err) if err.is_cancelled() => Ok(()),
        Err(err) => Err(err).context("signal handler panicked"),
    }
}
