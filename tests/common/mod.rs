//! Shared test fixtures: an in-memory host double, corpus sources, and
//! sample corpora.

// Items used across different integration test crates.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::BoxFuture;
use sitesearch::corpus::CorpusSource;
use sitesearch::host::Host;
use sitesearch::render::{ResultList, WriteOutcome};

/// Corpus served from a string, standing in for the network fetch.
pub struct MemSource(pub String);

impl CorpusSource for MemSource {
    fn name(&self) -> String {
        "mem".to_string()
    }

    fn fetch(&self) -> BoxFuture<'_, sitesearch::Result<String>> {
        Box::pin(async move { Ok(self.0.clone()) })
    }
}

/// Corpus source that always fails, simulating a rejected fetch.
pub struct FailingSource;

impl CorpusSource for FailingSource {
    fn name(&self) -> String {
        "failing".to_string()
    }

    fn fetch(&self) -> BoxFuture<'_, sitesearch::Result<String>> {
        Box::pin(async move { Err(anyhow::anyhow!("fetch rejected")) })
    }
}

/// In-memory host page double.
///
/// Interior mutability throughout so tests can flip widget presence and
/// inspect writes through the shared `Arc`.
#[derive(Default)]
pub struct MockHost {
    pub present: AtomicBool,
    pub query: Mutex<String>,
    pub results: Mutex<String>,
    pub meta: Mutex<String>,
    pub activations: Mutex<Vec<usize>>,
}

impl MockHost {
    /// Host whose widget is already in the page.
    pub fn with_widget() -> Self {
        let host = Self::default();
        host.present.store(true, Ordering::SeqCst);
        host
    }

    pub fn set_query(&self, q: &str) {
        *self.query.lock().unwrap() = q.to_string();
    }

    pub fn results(&self) -> String {
        self.results.lock().unwrap().clone()
    }

    pub fn meta(&self) -> String {
        self.meta.lock().unwrap().clone()
    }

    /// Simulate the legacy widget overwriting the container.
    pub fn foreign_write(&self, markup: &str) {
        *self.results.lock().unwrap() = markup.to_string();
    }
}

impl ResultList for MockHost {
    fn write_results(&self, markup: &str) -> WriteOutcome {
        let mut current = self.results.lock().unwrap();
        if *current == markup {
            return WriteOutcome::Unchanged;
        }
        *current = markup.to_string();
        WriteOutcome::Changed
    }

    fn write_meta(&self, text: &str) -> bool {
        *self.meta.lock().unwrap() = text.to_string();
        true
    }
}

impl Host for MockHost {
    fn widget_present(&self) -> bool {
        self.present.load(Ordering::SeqCst)
    }

    fn query_value(&self) -> Option<String> {
        if self.widget_present() {
            Some(self.query.lock().unwrap().clone())
        } else {
            None
        }
    }

    fn activate_result(&self, index: usize) -> bool {
        self.activations.lock().unwrap().push(index);
        true
    }
}

/// A small blog-shaped corpus: one caching page with sections, one
/// unrelated post, one tag listing.
pub fn sample_corpus() -> String {
    r#"{"docs":[
        {"location":"posts/caching/","title":"Intro to Caching","text":"Caches store results close to where they are needed."},
        {"location":"posts/caching/#eviction","title":"Eviction","text":"LRU eviction policy details for the cache."},
        {"location":"posts/caching/#warming","title":"Cache Warming","text":"Preloading the cache before traffic arrives."},
        {"location":"posts/unrelated/","title":"Gardening Notes","text":"Tomatoes and soil and nothing else."},
        {"location":"tags/","title":"Tags","text":"All posts about caching and gardening."}
    ]}"#
    .to_string()
}

/// Write a corpus JSON to a temp file and return its path.
pub fn corpus_file(dir: &tempfile::TempDir, json: &str) -> PathBuf {
    let path = dir.path().join("search_index.json");
    std::fs::write(&path, json).unwrap();
    path
}
