use anyhow::Result;
use clap::Parser;
use quote_ticker::cli::{self, Cli};
use quote_ticker::{logging, serve, watch};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<()> {
    let result = match Cli::parse().command() {
        cli::Command::Serve(args) => serve::run(args).await,
        cli::Command::Watch(args) => watch::run(args).await,
    };

    if let Err(err) = &result {
        logging::error(
            "app.exit",
            "quote-ticker stopped with an error",
            json!({ "error": format!("{err:#}") }),
        );
    }
    result
}
