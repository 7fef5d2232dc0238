//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (Typesense, in-memory fakes).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::{ImportAction, ImportResult};
use crate::typesense::CollectionSchema;
use nde_indexer_shared::{SearchDocument, SearchQuery, SearchResponse};

/// Abstracts the underlying search index implementation.
///
/// Implementations are injected into the pipeline loader and the CLI to enable
/// dependency injection and easy testing with mock implementations.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// different backend implementations.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Check if the search node is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the node reports itself healthy
    /// * `Ok(false)` - If the node answers but is not ready
    /// * `Err(SearchIndexError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchIndexError>;

    /// Delete a collection and all of its documents.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the collection was deleted
    /// * `Err(SearchIndexError::CollectionNotFound)` - If it did not exist
    /// * `Err(SearchIndexError)` - If the deletion fails
    async fn delete_collection(&self, name: &str) -> Result<(), SearchIndexError>;

    /// Create a collection with the given schema.
    ///
    /// Fails if a collection with the same name already exists.
    async fn create_collection(&self, schema: &CollectionSchema) -> Result<(), SearchIndexError>;

    /// Import a batch of documents in a single request.
    ///
    /// # Arguments
    ///
    /// * `collection` - Target collection or alias
    /// * `documents` - The documents to import
    /// * `action` - Whether existing documents are rejected or replaced
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ImportResult>)` - One result per document, in input order
    /// * `Err(SearchIndexError)` - If the request as a whole fails
    async fn import_documents(
        &self,
        collection: &str,
        documents: &[SearchDocument],
        action: ImportAction,
    ) -> Result<Vec<ImportResult>, SearchIndexError>;

    /// Execute a search query against a collection.
    async fn search(
        &self,
        collection: &str,
        query: &SearchQuery,
    ) -> Result<SearchResponse, SearchIndexError>;

    /// Resolve an alias to the collection it points at.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(name))` - The aliased collection
    /// * `Ok(None)` - If the alias does not exist
    async fn get_alias(&self, alias: &str) -> Result<Option<String>, SearchIndexError>;

    /// Create or re-point an alias in one atomic step.
    async fn upsert_alias(&self, alias: &str, collection: &str) -> Result<(), SearchIndexError>;
}
