//! # NDE Indexer
//!
//! Main library for the NDE video transcript search indexer.
//!
//! This crate provides the configuration and dependency wiring for running
//! the reindex pipeline and the read-path commands.

pub mod config;

pub use config::{Dependencies, ImportProfile, IndexerConfig, LogFormat, Overrides};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] nde_indexer_pipeline::PipelineError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] nde_indexer_repository::SearchIndexError),

    /// Source error.
    #[error("Source error: {0}")]
    SourceError(#[from] nde_indexer_repository::SourceError),

    /// Output serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
