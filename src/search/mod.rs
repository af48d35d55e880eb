//! Ranked full-text retrieval over the document corpus.
//!
//! Tokenization and stemming feed a per-field term-frequency index; the
//! query facade applies field boosts and the hit limit.

pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod tokenize;

pub use index::SearchIndex;
pub use query::QueryEngine;

pub(crate) use index::IndexBuilder;
