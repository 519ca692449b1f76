use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use crate::constants::{REFRESH_INTERVAL_SECS, SERVER_BIND_ADDR};
use crate::logging;
use crate::renderer::TickerRenderer;
use crate::scheduler::{RefreshScheduler, SchedulerConfig};
use crate::shutdown;
use crate::sink::{MarkupSink, PageFile, Stdout};
use crate::source::{FileSource, HttpSource, SnapshotSource};

#[derive(Debug, Args, Clone)]
pub struct WatchArgs {
    /// Base URL serving /stock_data.json (or the full snapshot URL)
    #[arg(short, long, conflicts_with = "snapshot")]
    pub endpoint: Option<String>,

    /// Read the snapshot from a local JSON file instead of HTTP
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Write a self-reloading HTML page here instead of printing markup
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seconds between refreshes
    #[arg(long, default_value_t = REFRESH_INTERVAL_SECS)]
    pub refresh_secs: u64,

    /// Refresh once and exit, failing if the refresh fails
    #[arg(long)]
    pub once: bool,
}

pub async fn run(args: WatchArgs) -> Result<()> {
    let source: Arc<dyn SnapshotSource> = match (&args.snapshot, &args.endpoint) {
        (Some(path), _) => Arc::new(FileSource::new(path)),
        (None, endpoint) => {
            let base = endpoint
                .clone()
                .unwrap_or_else(|| format!("http://{SERVER_BIND_ADDR}"));
            Arc::new(HttpSource::new(&base).context("failed to build HTTP client")?)
        }
    };

    let refresh_secs = args.refresh_secs.max(1);
    let sink: Arc<dyn MarkupSink> = match &args.output {
        Some(path) => Arc::new(PageFile::new(path, Some(refresh_secs))),
        None => Arc::new(Stdout),
    };

    let renderer = Arc::new(TickerRenderer::new(source, sink));

    if args.once {
        let outcome = renderer
            .refresh()
            .await
            .with_context(|| format!("refresh from {} failed", renderer.source().describe()))?;
        if let Some(path) = &args.output {
            logging::info(
                "watch.written",
                "Ticker page written",
                json!({ "path": path.display().to_string(), "symbols": outcome.symbols }),
            );
        }
        return Ok(());
    }

    let handle = RefreshScheduler::new(SchedulerConfig {
        interval: Duration::from_secs(refresh_secs),
        max_refreshes: None,
    })
    .start(renderer);

    let (shutdown_tx, mut shutdown_rx) = shutdown::channel();
    let signals_task = tokio::spawn(shutdown::handle_signals(shutdown_tx));
    let signal = shutdown::requested(&mut shutdown_rx).await;

    let stats = handle.stop_with(signal).await?;
    shutdown::finish_signals(signals_task).await?;

    logging::info(
        "watch.stop",
        "Ticker watch finished",
        json!({ "attempts": stats.attempts, "failures": stats.failures }),
    );
    Ok(())
}
