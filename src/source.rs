//! Input side of a refresh: where snapshots come from.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::constants::{FETCH_TIMEOUT_SECS, SNAPSHOT_PATH};
use crate::error::RefreshError;
use crate::quote::QuoteSnapshot;

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> Result<QuoteSnapshot, RefreshError>;

    /// Human-readable origin used in log metadata.
    fn describe(&self) -> String;
}

/// GET `{base_url}/stock_data.json`.
pub struct HttpSource {
    url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self, RefreshError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            url: snapshot_url(base_url),
            client,
        }
    }
}

/// Accepts a bare base (`http://host:8000`) or a full snapshot URL.
pub fn snapshot_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with(".json") {
        trimmed.to_string()
    } else {
        format!("{trimmed}{SNAPSHOT_PATH}")
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch(&self) -> Result<QuoteSnapshot, RefreshError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefreshError::Status(status));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(RefreshError::from_decode)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads a snapshot document from disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn fetch(&self) -> Result<QuoteSnapshot, RefreshError> {
        let body = tokio::fs::read(&self.path).await?;
        serde_json::from_slice(&body).map_err(RefreshError::from_decode)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
