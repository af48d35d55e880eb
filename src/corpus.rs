//! Corpus loading and index construction.
//!
//! The corpus is the site generator's `search_index.json`: one record per
//! page plus one per heading. Loading is asynchronous and fails soft; a
//! broken corpus leaves ranked search disabled, never the host page broken.

use std::path::PathBuf;

use futures::future::BoxFuture;
use serde::Deserialize;

use crate::error::{Result, SearchError};
use crate::normalize::normalize;
use crate::search::{IndexBuilder, SearchIndex};
use crate::types::Document;

/// Serialized corpus shape.
#[derive(Debug, Deserialize)]
struct CorpusFile {
    docs: Vec<Document>,
}

/// Where the corpus comes from: the in-page implementation fetches over
/// HTTP, the CLI and tests read from disk.
pub trait CorpusSource: Send + Sync + 'static {
    /// Human-readable name for log messages.
    fn name(&self) -> String;

    /// Fetch the raw corpus JSON.
    fn fetch(&self) -> BoxFuture<'_, Result<String>>;
}

/// Corpus file on local disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            let raw = tokio::fs::read_to_string(&self.path).await?;
            Ok(raw)
        })
    }
}

/// Fetch, parse, normalize, and index the corpus.
///
/// Documents with an empty title *and* empty text carry no signal and are
/// dropped before indexing. Errors map to [`SearchError::LoadFailure`]; the
/// caller logs and leaves the session not ready.
pub async fn build_index(source: &dyn CorpusSource) -> Result<SearchIndex> {
    let raw = source
        .fetch()
        .await
        .map_err(|e| SearchError::LoadFailure {
            source_name: source.name(),
            reason: e.to_string(),
        })?;

    let corpus: CorpusFile =
        serde_json::from_str(&raw).map_err(|e| SearchError::LoadFailure {
            source_name: source.name(),
            reason: e.to_string(),
        })?;

    let total = corpus.docs.len();
    let mut builder = IndexBuilder::default();
    let mut indexed = 0usize;
    for doc in corpus.docs {
        if doc.title.is_empty() && doc.text.is_empty() {
            continue;
        }
        builder.insert(Document {
            location: doc.location,
            title: normalize(&doc.title),
            text: normalize(&doc.text),
        });
        indexed += 1;
    }

    tracing::info!(
        "Corpus '{}': indexed {} of {} documents",
        source.name(),
        indexed,
        total
    );
    Ok(builder.finalize())
}
