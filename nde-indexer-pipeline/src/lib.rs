//! # NDE Indexer Pipeline
//!
//! This crate provides the pipeline components for rebuilding the video
//! transcript search collection from the relational store.
//!
//! ## Architecture
//!
//! The pipeline follows the Extractor-Processor-Loader pattern:
//!
//! 1. **Extractor**: Reads the video and segment tables page by page
//! 2. **Processor**: Joins segments with their videos into search documents
//! 3. **Loader**: Resets the collection and imports documents in batches
//! 4. **Orchestrator**: Coordinates the pipeline flow

pub mod errors;
pub mod extractor;
pub mod loader;
pub mod orchestrator;
pub mod processor;

#[cfg(test)]
mod testing;

pub use errors::PipelineError;
pub use extractor::{ExtractorConfig, TableExtractor};
pub use loader::{CollectionLoader, LoadReport, LoaderConfig, LoaderState, ResetMode};
pub use orchestrator::{Orchestrator, RunReport};
pub use processor::{JoinOutput, JoinStats, SegmentJoiner};
