//! Error types for the reindex pipeline.

use nde_indexer_repository::{SearchIndexError, SourceError};
use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Recoverable conditions (a missing collection on reset, rejected
/// documents) are logged by the stage that hits them and never surface here.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Reading from the relational store failed.
    #[error("Extractor error: {0}")]
    ExtractorError(#[from] SourceError),

    /// Error from the loader component.
    #[error("Loader error: {0}")]
    LoaderError(String),

    /// Error from the search engine.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchIndexError),

    /// A stage was configured with unusable settings.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl PipelineError {
    /// Create a loader error.
    pub fn loader(msg: impl Into<String>) -> Self {
        Self::LoaderError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
