use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::constants::{
    DEFAULT_TICKERS, LOGO_DIR, LOGO_URL_TEMPLATE, PUBLISH_INTERVAL_SECS, REFRESH_INTERVAL_SECS,
    SERVER_BIND_ADDR, SERVER_PORT,
};
use crate::publisher::{LogoFetcher, PublisherConfig, QuotePublisher, SimulatedFeed, SnapshotStore};
use crate::renderer::TickerRenderer;
use crate::scheduler::{run_refresh_loop, SchedulerConfig};
use crate::server::{self, AppState};
use crate::shutdown::{self, ShutdownSignal};
use crate::sink::Container;
use crate::source::HttpSource;
use crate::watchlist::Watchlist;

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Address for the page, snapshot and watchlist endpoints
    #[arg(short, long, default_value = SERVER_BIND_ADDR)]
    pub bind: SocketAddr,

    /// Seconds between published snapshots
    #[arg(long, default_value_t = PUBLISH_INTERVAL_SECS)]
    pub publish_secs: u64,

    /// Seconds between ticker refreshes
    #[arg(long, default_value_t = REFRESH_INTERVAL_SECS)]
    pub refresh_secs: u64,

    /// Seed the simulated quote feed for reproducible prices
    #[arg(long)]
    pub seed: Option<u64>,

    /// Comma-separated symbols to track on startup
    #[arg(long, value_delimiter = ',')]
    pub tickers: Vec<String>,

    /// Directory served under /logos
    #[arg(long, default_value = LOGO_DIR)]
    pub logo_dir: PathBuf,

    /// Where missing logos are downloaded from; `{domain}` is replaced
    #[arg(long, default_value = LOGO_URL_TEMPLATE)]
    pub logo_url: String,

    /// Serve only logos already in the logo directory
    #[arg(long)]
    pub no_logo_download: bool,
}

impl Default for ServeArgs {
    fn default() -> Self {
        ServeConfig::default().into()
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    pub publish_interval: Duration,
    pub refresh_interval: Duration,
    pub seed: Option<u64>,
    pub tickers: Vec<String>,
    pub logo_dir: PathBuf,
    /// Logo download template; `None` disables downloads.
    pub logo_url: Option<String>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, SERVER_PORT)),
            publish_interval: Duration::from_secs(PUBLISH_INTERVAL_SECS),
            refresh_interval: Duration::from_secs(REFRESH_INTERVAL_SECS),
            seed: None,
            tickers: DEFAULT_TICKERS.iter().map(|s| s.to_string()).collect(),
            logo_dir: PathBuf::from(LOGO_DIR),
            logo_url: Some(LOGO_URL_TEMPLATE.to_string()),
        }
    }
}

impl From<ServeArgs> for ServeConfig {
    fn from(args: ServeArgs) -> Self {
        let defaults = ServeConfig::default();
        Self {
            bind: args.bind,
            publish_interval: Duration::from_secs(args.publish_secs.max(1)),
            refresh_interval: Duration::from_secs(args.refresh_secs.max(1)),
            seed: args.seed,
            tickers: if args.tickers.is_empty() {
                defaults.tickers
            } else {
                args.tickers
            },
            logo_dir: args.logo_dir,
            logo_url: (!args.no_logo_download).then_some(args.logo_url),
        }
    }
}

impl From<ServeConfig> for ServeArgs {
    fn from(config: ServeConfig) -> Self {
        Self {
            bind: config.bind,
            publish_secs: config.publish_interval.as_secs(),
            refresh_secs: config.refresh_interval.as_secs(),
            seed: config.seed,
            tickers: config.tickers,
            logo_dir: config.logo_dir,
            no_logo_download: config.logo_url.is_none(),
            logo_url: config
                .logo_url
                .unwrap_or_else(|| LOGO_URL_TEMPLATE.to_string()),
        }
    }
}

pub async fn run(args: ServeArgs) -> Result<()> {
    run_with_config(args.into()).await
}

pub async fn run_with_config(config: ServeConfig) -> Result<()> {
    let listener = server::bind(config.bind).await?;
    let (shutdown_tx, shutdown_rx) = shutdown::channel();
    let signals_task = tokio::spawn(shutdown::handle_signals(shutdown_tx));

    let result = run_on(listener, config, shutdown_rx).await;
    let signals = shutdown::finish_signals(signals_task).await;
    result.and(signals)
}

/// Publisher, server and refresh loop on an already bound listener. The
/// refresh loop reads the snapshot back over HTTP, exactly like any other
/// ticker client would.
pub async fn run_on(
    listener: TcpListener,
    config: ServeConfig,
    shutdown: watch::Receiver<ShutdownSignal>,
) -> Result<()> {
    let addr = listener.local_addr().context("listener has no local address")?;

    let watchlist = Watchlist::from_symbols(&config.tickers);
    let snapshots = SnapshotStore::new();
    let container = Container::new();

    let feed = match config.seed {
        Some(seed) => SimulatedFeed::seeded(seed),
        None => SimulatedFeed::new(),
    };
    let mut publisher = QuotePublisher::new(
        PublisherConfig {
            interval: config.publish_interval,
            ..PublisherConfig::default()
        },
        feed,
        watchlist.clone(),
        snapshots.clone(),
    );
    if let Some(template) = &config.logo_url {
        let logos =
            LogoFetcher::new(&config.logo_dir, template).context("failed to build logo client")?;
        publisher = publisher.with_logos(logos);
    }

    let state = AppState {
        snapshots,
        container: container.clone(),
        watchlist,
        logo_dir: config.logo_dir.clone(),
        page_reload_secs: Some(config.refresh_interval.as_secs().max(1)),
    };

    let source = HttpSource::new(&format!("http://{addr}")).context("failed to build HTTP client")?;
    let renderer = Arc::new(TickerRenderer::new(Arc::new(source), Arc::new(container)));
    let scheduler = SchedulerConfig {
        interval: config.refresh_interval,
        max_refreshes: None,
    };

    let refresh_shutdown = shutdown.clone();
    let publisher_shutdown = shutdown.clone();

    // The publisher goes first: its opening publish happens on the first
    // poll, before the server accepts any connection.
    tokio::try_join!(
        publisher.run(publisher_shutdown),
        server::serve(listener, state, shutdown),
        async {
            run_refresh_loop(scheduler, renderer, refresh_shutdown).await;
            Ok::<(), anyhow::Error>(())
        },
    )?;

    Ok(())
}
