pub mod cli;
pub mod constants;
pub mod error;
pub mod logging;
pub mod page;
pub mod publisher;
pub mod quote;
pub mod render;
pub mod renderer;
pub mod scheduler;
pub mod serve;
pub mod server;
pub mod shutdown;
pub mod sink;
pub mod source;
pub mod watch;
pub mod watchlist;

pub use error::{LogoError, RefreshError, WatchlistError};
pub use quote::{Quote, QuoteSnapshot};
pub use renderer::{RefreshOutcome, TickerRenderer};
pub use scheduler::{RefreshScheduler, SchedulerConfig, SchedulerHandle};
pub use sink::{Container, MarkupSink};
pub use source::{HttpSource, SnapshotSource};
