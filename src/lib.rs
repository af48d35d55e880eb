//! Ranked full-text search pipeline for statically generated doc sites.
//!
//! Replaces a host page's default lexical search with relevance-ranked
//! retrieval over a prebuilt document corpus: load and normalize the
//! corpus, execute boosted term-frequency queries, merge per-section hits
//! into page-level groups, pick maximal-density snippets, highlight query
//! terms, and keep the rendered results asserted against a host widget
//! that performs its own asynchronous writes.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod highlight;
pub mod host;
pub mod normalize;
pub mod render;
pub mod search;
pub mod snippet;
pub mod tracing;
pub mod types;

pub use aggregate::Aggregator;
pub use config::{FieldBoosts, SearchConfig};
pub use corpus::{CorpusSource, FileSource, build_index};
pub use error::{Result, SearchError};
pub use host::{Host, Key, Synchronizer};
pub use render::{RenderSink, ResultList, WriteOutcome};
pub use search::{QueryEngine, SearchIndex};
pub use types::{Document, Hit, ResultGroup, SearchSession, Section};
