//! Output side of a refresh: whatever currently displays the ticker strip.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::RefreshError;
use crate::page::render_page;

/// Destination that owns the ticker content. Each call replaces the previous
/// content wholesale.
pub trait MarkupSink: Send + Sync {
    fn render(&self, markup: &str) -> Result<(), RefreshError>;
}

/// Shared in-memory container. Clones observe the same content.
#[derive(Clone, Default)]
pub struct Container {
    content: Arc<RwLock<String>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> String {
        self.content.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.content.read().is_empty()
    }
}

impl MarkupSink for Container {
    fn render(&self, markup: &str) -> Result<(), RefreshError> {
        let mut content = self.content.write();
        content.clear();
        content.push_str(markup);
        Ok(())
    }
}

/// Writes a complete HTML page to disk. The page is written next to the
/// target and renamed over it so readers never see a partial file.
pub struct PageFile {
    path: PathBuf,
    reload_secs: Option<u64>,
}

impl PageFile {
    pub fn new(path: impl Into<PathBuf>, reload_secs: Option<u64>) -> Self {
        Self {
            path: path.into(),
            reload_secs,
        }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl MarkupSink for PageFile {
    fn render(&self, markup: &str) -> Result<(), RefreshError> {
        let staging = self.staging_path();
        std::fs::write(&staging, render_page(markup, self.reload_secs))?;
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

/// Prints each strip as one line.
pub struct Stdout;

impl MarkupSink for Stdout {
    fn render(&self, markup: &str) -> Result<(), RefreshError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{markup}")
            .and_then(|_| out.flush())
            .map_err(|err| RefreshError::Sink(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_replaces_content() {
        let container = Container::new();
        let view = container.clone();
        assert!(view.is_empty());

        container.render("first").unwrap();
        container.render("second").unwrap();
        assert_eq!(view.content(), "second");
    }

    #[test]
    fn page_file_writes_whole_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("index.html");
        let sink = PageFile::new(&path, Some(5));

        sink.render("<div class='stock'>AAPL</div>").unwrap();
        sink.render("<div class='stock'>MSFT</div>").unwrap();

        let page = std::fs::read_to_string(&path).expect("page written");
        assert!(page.contains("MSFT"));
        assert!(!page.contains("AAPL"));
        assert!(!dir.path().join("index.html.tmp").exists());
    }
}
