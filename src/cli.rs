use clap::{Parser, Subcommand};

use crate::serve::ServeArgs;
use crate::watch::WatchArgs;

#[derive(Debug, Parser)]
#[command(author, version, about = "Scrolling stock quote ticker")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn command(self) -> Command {
        self.command.unwrap_or_default()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Publish simulated quotes and serve the ticker page, snapshot and watchlist API
    Serve(ServeArgs),
    /// Poll a snapshot endpoint and render the ticker strip to stdout or a page file
    Watch(WatchArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Serve(ServeArgs::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::parse_from(["quote-ticker"]);
        assert!(matches!(cli.command(), Command::Serve(_)));
    }

    #[test]
    fn watch_flags_parse() {
        let cli = Cli::parse_from([
            "quote-ticker",
            "watch",
            "--endpoint",
            "http://localhost:8000",
            "--once",
        ]);
        match cli.command() {
            Command::Watch(args) => {
                assert!(args.once);
                assert_eq!(args.refresh_secs, 5);
                assert_eq!(args.endpoint.as_deref(), Some("http://localhost:8000"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn endpoint_and_snapshot_conflict() {
        let parsed = Cli::try_parse_from([
            "quote-ticker",
            "watch",
            "--endpoint",
            "http://localhost:8000",
            "--snapshot",
            "stock_data.json",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn serve_tickers_split_on_commas() {
        let cli = Cli::parse_from(["quote-ticker", "serve", "--tickers", "aapl,nvda"]);
        match cli.command() {
            Command::Serve(args) => assert_eq!(args.tickers, vec!["aapl", "nvda"]),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
