//! Error types for the search indexer repository.

mod search_index_error;
mod source_error;

pub use search_index_error::SearchIndexError;
pub use source_error::SourceError;
