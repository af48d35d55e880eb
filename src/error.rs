//! Error handling types and utilities.

/// A specialized Result type for sitesearch operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Failure taxonomy for the search pipeline.
///
/// None of these are fatal to the host page: every variant degrades to
/// "ranked search unavailable". An empty query is deliberately absent here;
/// it is a no-op, not an error.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Corpus fetch or parse failed. The session stays not-ready; the index
    /// build is not retried within one page lifetime.
    #[error("failed to load search corpus from '{source_name}': {reason}")]
    LoadFailure { source_name: String, reason: String },

    /// The result container disappeared between trigger and render.
    /// The render silently aborts.
    #[error("result container detached before render")]
    RenderTargetMissing,
}
