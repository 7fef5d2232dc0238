//! Interface definitions for the external services.
//!
//! This module defines the abstract `RowSource` and `SearchIndexProvider`
//! traits that allow for dependency injection and swappable backends.

mod row_source;
mod search_index_provider;

pub use row_source::RowSource;
pub use search_index_provider::SearchIndexProvider;
