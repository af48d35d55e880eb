//! Query execution facade over the built index.

use std::sync::Arc;

use super::index::SearchIndex;
use crate::config::{FieldBoosts, SearchConfig};
use crate::types::Hit;

/// Executes ranked queries with the configured boosts and hit limit.
///
/// The underlying ranking is a black box from the caller's perspective: only
/// the boost ratio and descending-score ordering are contractual.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine {
    boosts: FieldBoosts,
    limit: usize,
}

impl QueryEngine {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            boosts: config.boosts,
            limit: config.hit_limit,
        }
    }

    /// Run `query` against `index`.
    ///
    /// Returns `None` when the index is not ready or the query is
    /// empty/whitespace-only; both are no-ops distinct from a real query
    /// with zero matches, which returns `Some` with an empty hit list.
    pub fn search(&self, index: Option<&Arc<SearchIndex>>, query: &str) -> Option<Vec<Hit>> {
        let index = index?;
        if query.trim().is_empty() {
            return None;
        }
        Some(index.search(query, self.boosts, self.limit))
    }
}
