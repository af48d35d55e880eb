//! Core data model shared across the pipeline.

use serde::Deserialize;

/// One indexable unit from the corpus file.
///
/// A page contributes one fragment-less record plus one record per heading
/// (`location` carrying a `#fragment` suffix). The fragment-less record with
/// a non-empty title is the "page" record for its base location.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

impl Document {
    /// Location with any `#fragment` suffix removed.
    pub fn base_location(&self) -> &str {
        self.location.split('#').next().unwrap_or("")
    }

    /// Whether this record is a sub-section rather than the page itself.
    pub fn is_fragment(&self) -> bool {
        self.location.contains('#')
    }
}

/// A single matched document with its relevance score.
///
/// Scores are non-negative and unnormalized; only descending order across a
/// result list is meaningful.
#[derive(Debug, Clone)]
pub struct Hit {
    pub document: Document,
    pub score: f32,
}

/// A matched sub-section inside a [`ResultGroup`].
#[derive(Debug, Clone)]
pub struct Section {
    pub location: String,
    pub title: String,
    pub text: String,
    pub score: f32,
}

/// All hits sharing one base page, merged into a page-level entry.
#[derive(Debug, Clone)]
pub struct ResultGroup {
    pub base_location: String,
    pub page_title: String,
    pub page_text: Option<String>,
    /// Visible sections, descending by score, capped by config.
    pub sections: Vec<Section>,
    /// Sections filtered by the cap, reported as "N more" in the UI.
    pub hidden_sections: usize,
    pub top_score: f32,
    /// Aggregate/listing pages are demoted below content pages.
    pub is_index_page: bool,
}

/// Per-session mutable state owned by the host synchronizer.
///
/// This replaces the ambient module-level globals of a typical in-page
/// script: it is constructed on hook and discarded on navigation-away, so
/// the query engine and aggregator stay testable without a host.
#[derive(Debug, Default)]
pub struct SearchSession {
    /// Most recent input value; read back by re-render triggers.
    pub last_query: String,
    /// Flips true exactly once, when the index build completes.
    pub ready: bool,
    /// Keyboard cursor over rendered result links: -1 means none.
    pub cursor: isize,
    /// Self-write marker, armed by the render sink and consumed by the
    /// mutation handler. This is the mutual-exclusion device that keeps the
    /// synchronizer from reacting to its own writes.
    pub self_write: bool,
}
