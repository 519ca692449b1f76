use std::sync::Arc;

use crate::error::RefreshError;
use crate::render::render_strip;
use crate::sink::MarkupSink;
use crate::source::SnapshotSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub symbols: usize,
    pub markup_bytes: usize,
}

/// Fetch → render → replace. Holds no state between refreshes; a failed
/// cycle never reaches the sink, so it keeps whatever it showed before.
pub struct TickerRenderer {
    source: Arc<dyn SnapshotSource>,
    sink: Arc<dyn MarkupSink>,
}

impl TickerRenderer {
    pub fn new(source: Arc<dyn SnapshotSource>, sink: Arc<dyn MarkupSink>) -> Self {
        Self { source, sink }
    }

    pub async fn refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        let snapshot = self.source.fetch().await?;
        let markup = render_strip(&snapshot);
        self.sink.render(&markup)?;
        Ok(RefreshOutcome {
            symbols: snapshot.len(),
            markup_bytes: markup.len(),
        })
    }

    pub fn source(&self) -> &dyn SnapshotSource {
        self.source.as_ref()
    }
}
