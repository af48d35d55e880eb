//! Tunables for the search pipeline.

use std::time::Duration;

/// Relative weight of each indexed field when combining scores.
///
/// Titles are curated on a documentation/blog corpus, so a title match is a
/// much stronger relevance signal than a body match.
#[derive(Debug, Clone, Copy)]
pub struct FieldBoosts {
    pub title: f32,
    pub text: f32,
}

impl Default for FieldBoosts {
    fn default() -> Self {
        Self {
            title: 5.0,
            text: 1.0,
        }
    }
}

/// Configuration for the whole pipeline, constructed once per page load.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Site base prepended to document locations when building links.
    pub base_url: String,
    /// Field weights applied at query time.
    pub boosts: FieldBoosts,
    /// Cap on raw hits returned by a single query, bounding render cost.
    pub hit_limit: usize,
    /// Visible sections per result group; the rest become an overflow count.
    pub section_cap: usize,
    /// Maximum snippet length in characters, ellipsis markers excluded.
    pub snippet_len: usize,
    /// Characters of lead-in kept before the densest match window.
    pub snippet_lead_in: usize,
    /// Tolerance when snapping snippet edges to a word boundary.
    pub snippet_tolerance: usize,
    /// Settle interval before a keystroke triggers a render.
    pub debounce: Duration,
    /// How long the synchronizer keeps watching for the host widget to
    /// appear before giving up until the next page replacement.
    pub hook_window: Duration,
    /// Path prefixes of aggregate/listing pages (tag indexes, archive
    /// roots). Matching groups are demoted below content pages.
    pub index_page_patterns: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "/".to_string(),
            boosts: FieldBoosts::default(),
            hit_limit: 30,
            section_cap: 4,
            snippet_len: 200,
            snippet_lead_in: 30,
            snippet_tolerance: 15,
            debounce: Duration::from_millis(150),
            hook_window: Duration::from_secs(5),
            index_page_patterns: vec!["tags/".to_string(), "archive/".to_string()],
        }
    }
}

impl SearchConfig {
    /// Whether a base location names an aggregate/listing page.
    pub fn is_index_page(&self, base_location: &str) -> bool {
        self.index_page_patterns
            .iter()
            .any(|p| base_location.starts_with(p.as_str()))
    }

    /// Absolute link for a document location.
    pub fn page_url(&self, location: &str) -> String {
        format!("{}{}", self.base_url, location)
    }
}
