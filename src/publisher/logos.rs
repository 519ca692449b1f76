//! Company logos cached on disk under the served logo directory.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use serde_json::json;

use crate::constants::{LOGO_TIMEOUT_SECS, LOGO_URL_TEMPLATE};
use crate::error::LogoError;
use crate::logging;

use super::feed::is_listed;

/// Downloads `{SYMBOL}.png` once per symbol. A cached file is never
/// refetched; a failed download is retried on the next publish.
pub struct LogoFetcher {
    dir: PathBuf,
    url_template: String,
    client: Client,
}

impl LogoFetcher {
    /// `url_template` carries a `{domain}` placeholder.
    pub fn new(dir: impl Into<PathBuf>, url_template: &str) -> Result<Self, LogoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(LOGO_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_client(dir, url_template, client))
    }

    pub fn with_client(dir: impl Into<PathBuf>, url_template: &str, client: Client) -> Self {
        Self {
            dir: dir.into(),
            url_template: url_template.to_string(),
            client,
        }
    }

    pub fn clearbit(dir: impl Into<PathBuf>) -> Result<Self, LogoError> {
        Self::new(dir, LOGO_URL_TEMPLATE)
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.png"))
    }

    pub fn url_for(&self, symbol: &str) -> String {
        self.url_template.replace("{domain}", &company_domain(symbol))
    }

    /// `Ok(true)` when a logo was downloaded, `Ok(false)` when it was already
    /// cached or the symbol cannot name a file.
    pub async fn ensure(&self, symbol: &str) -> Result<bool, LogoError> {
        if !is_listed(symbol) {
            return Ok(false);
        }
        let path = self.path_for(symbol);
        if tokio::fs::try_exists(&path).await? {
            return Ok(false);
        }

        let response = self.client.get(self.url_for(symbol)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LogoError::Status(status));
        }
        let bytes = response.bytes().await?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let staging = self.dir.join(format!(".{symbol}.png.tmp"));
        tokio::fs::write(&staging, &bytes).await?;
        tokio::fs::rename(&staging, &path).await?;
        Ok(true)
    }

    /// Fetch every missing logo. Failures are logged, never returned.
    pub async fn ensure_all(&self, symbols: &[String]) -> usize {
        let mut downloaded = 0;
        for symbol in symbols {
            match self.ensure(symbol).await {
                Ok(true) => {
                    downloaded += 1;
                    logging::info(
                        "logo.downloaded",
                        "Cached company logo",
                        json!({ "symbol": symbol, "path": self.path_for(symbol).display().to_string() }),
                    );
                }
                Ok(false) => {}
                Err(err) => logging::warn(
                    "logo.failed",
                    "Could not download company logo",
                    json!({ "symbol": symbol, "url": self.url_for(symbol), "error": err.to_string() }),
                ),
            }
        }
        downloaded
    }
}

/// Best guess at a company's web domain from its ticker.
pub fn company_domain(symbol: &str) -> String {
    format!("{}.com", symbol.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use tokio::net::TcpListener;

    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\nlogo";

    async fn logo_stub() -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(
                "/:domain",
                get(
                    |State(hits): State<Arc<AtomicUsize>>, Path(domain): Path<String>| async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        if domain == "aapl.com" {
                            Ok(PNG.to_vec())
                        } else {
                            Err(StatusCode::NOT_FOUND)
                        }
                    },
                ),
            )
            .with_state(hits.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });
        (format!("http://{addr}/{{domain}}"), hits)
    }

    #[test]
    fn url_uses_lowercase_domain() {
        let fetcher = LogoFetcher::clearbit("logos").unwrap();
        assert_eq!(fetcher.url_for("AAPL"), "https://logo.clearbit.com/aapl.com");
        assert_eq!(fetcher.path_for("AAPL"), PathBuf::from("logos/AAPL.png"));
    }

    #[tokio::test]
    async fn downloads_once_then_uses_cache() {
        let (template, hits) = logo_stub().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let fetcher = LogoFetcher::new(dir.path().join("logos"), &template).unwrap();

        assert!(fetcher.ensure("AAPL").await.unwrap());
        assert_eq!(std::fs::read(fetcher.path_for("AAPL")).unwrap(), PNG);

        assert!(!fetcher.ensure("AAPL").await.unwrap());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_logged_and_skipped() {
        let (template, hits) = logo_stub().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let fetcher = LogoFetcher::new(dir.path(), &template).unwrap();

        let err = fetcher.ensure("MSFT").await.unwrap_err();
        assert!(matches!(err, LogoError::Status(status) if status == StatusCode::NOT_FOUND));
        assert!(!fetcher.path_for("MSFT").exists());

        let symbols = vec!["MSFT".to_string(), "BAD TICKER".to_string(), "AAPL".to_string()];
        assert_eq!(fetcher.ensure_all(&symbols).await, 1);
        assert!(fetcher.path_for("AAPL").exists());
        // unlisted symbols never reach the network
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }
}
