//! Extractor module for the reindex pipeline.
//!
//! Provides paginated full-table reads from the relational store.

mod table_extractor;
pub mod tables;

pub use table_extractor::{ExtractorConfig, TableExtractor};
