//! Loader module for the reindex pipeline.
//!
//! Resets the destination collection and bulk-imports the joined documents.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::PipelineError;
use nde_indexer_repository::typesense::{video_collection_schema, COLLECTION_NAME};
use nde_indexer_repository::{ImportAction, ImportResult, ImportSummary, SearchIndexProvider};
use nde_indexer_shared::SearchDocument;

/// How the destination collection is replaced on each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    /// Delete the collection, then create it again under the same name.
    Recreate,
    /// Build a new versioned collection and re-point an alias at it.
    AliasSwap,
}

impl fmt::Display for ResetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recreate => f.write_str("recreate"),
            Self::AliasSwap => f.write_str("alias-swap"),
        }
    }
}

impl FromStr for ResetMode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recreate" => Ok(Self::Recreate),
            "alias-swap" | "alias_swap" => Ok(Self::AliasSwap),
            other => Err(PipelineError::config(format!(
                "Unknown reset mode '{}' (expected recreate or alias-swap)",
                other
            ))),
        }
    }
}

/// Configuration for the collection loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Destination collection name (the alias name in alias-swap mode).
    pub collection: String,
    pub action: ImportAction,
    /// Number of documents per import request.
    pub batch_size: usize,
    pub reset_mode: ResetMode,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            collection: COLLECTION_NAME.to_string(),
            action: ImportAction::Upsert,
            batch_size: 2000,
            reset_mode: ResetMode::Recreate,
        }
    }
}

/// Progress of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    NotStarted,
    CollectionReset,
    CollectionCreated,
    Importing,
    Done,
}

/// Outcome of a load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    /// Collection the documents were written to.
    pub collection: String,
    /// Per-document import outcome.
    pub summary: ImportSummary,
    /// Number of import requests sent.
    pub batches: usize,
}

/// Loader that rebuilds the search collection from a full document set.
///
/// The loader is responsible for:
/// - Resetting the destination (missing collections are fine)
/// - Creating the collection with the fixed schema
/// - Importing in fixed-size batches, one request at a time
/// - Reporting, not raising, rejected documents
pub struct CollectionLoader {
    client: Arc<dyn SearchIndexProvider>,
    config: LoaderConfig,
    state: LoaderState,
}

impl CollectionLoader {
    /// Create a new loader with the given client.
    pub fn new(client: Arc<dyn SearchIndexProvider>) -> Self {
        Self::with_config(client, LoaderConfig::default())
    }

    /// Create a new loader with custom configuration.
    pub fn with_config(client: Arc<dyn SearchIndexProvider>, config: LoaderConfig) -> Self {
        Self {
            client,
            config,
            state: LoaderState::NotStarted,
        }
    }

    /// Current progress of the loader.
    pub fn state(&self) -> LoaderState {
        self.state
    }

    /// Replace the destination collection's contents with `documents`.
    ///
    /// Fails only if the destination cannot be created (or, in alias-swap
    /// mode, the alias cannot be re-pointed or a collection with the alias's
    /// name cannot be removed). Rejected documents are counted in the report.
    #[instrument(skip(self, documents), fields(
        collection = %self.config.collection,
        mode = %self.config.reset_mode,
        count = documents.len()
    ))]
    pub async fn load(&mut self, documents: Vec<SearchDocument>) -> Result<LoadReport, PipelineError> {
        if self.config.batch_size == 0 {
            return Err(PipelineError::config("batch size must be greater than zero"));
        }
        if self.config.collection.trim().is_empty() {
            return Err(PipelineError::config("collection name cannot be empty"));
        }

        let report = match self.config.reset_mode {
            ResetMode::Recreate => self.load_recreate(&documents).await?,
            ResetMode::AliasSwap => self.load_alias_swap(&documents).await?,
        };

        self.state = LoaderState::Done;
        Self::log_report(&report);
        Ok(report)
    }

    async fn load_recreate(&mut self, documents: &[SearchDocument]) -> Result<LoadReport, PipelineError> {
        let collection = self.config.collection.clone();

        self.reset_collection(&collection).await;
        self.create_collection(&collection).await?;
        let (summary, batches) = self.import(&collection, documents).await;

        Ok(LoadReport {
            collection,
            summary,
            batches,
        })
    }

    async fn load_alias_swap(&mut self, documents: &[SearchDocument]) -> Result<LoadReport, PipelineError> {
        let alias = self.config.collection.clone();

        // `Err` means the lookup itself failed; the alias may still exist.
        let previous = match self.client.get_alias(&alias).await {
            Ok(previous) => Ok(previous),
            Err(e) => {
                warn!(alias = %alias, error = %e, "Alias lookup failed, treating as unset");
                Err(e)
            }
        };
        self.state = LoaderState::CollectionReset;

        let current = previous.as_ref().ok().and_then(|p| p.as_deref());
        let collection = next_collection_name(&alias, current, Utc::now().timestamp_millis());
        self.create_collection(&collection).await?;
        let (summary, batches) = self.import(&collection, documents).await;

        if let Ok(None) = previous {
            // A concrete collection with the alias's name shadows the alias.
            if let Err(e) = self.remove_shadowing_collection(&alias).await {
                self.discard_collection(&collection).await;
                return Err(e);
            }
        }

        if let Err(e) = self.client.upsert_alias(&alias, &collection).await {
            self.discard_collection(&collection).await;
            return Err(e.into());
        }

        if let Ok(Some(previous)) = previous {
            if previous != collection {
                match self.client.delete_collection(&previous).await {
                    Ok(()) => info!(collection = %previous, "Deleted previous collection"),
                    Err(e) => warn!(collection = %previous, error = %e, "Failed to delete previous collection"),
                }
            }
        }

        Ok(LoadReport {
            collection,
            summary,
            batches,
        })
    }

    /// Delete a concrete collection named like the alias, if there is one.
    ///
    /// The search engine resolves collection names before aliases, so
    /// leaving it in place would hide the new collection from readers.
    async fn remove_shadowing_collection(&self, alias: &str) -> Result<(), PipelineError> {
        match self.client.delete_collection(alias).await {
            Ok(()) => {
                info!(collection = %alias, "Deleted collection shadowing the alias");
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(PipelineError::loader(format!(
                "Collection {} would shadow the alias and could not be deleted: {}",
                alias, e
            ))),
        }
    }

    /// Drop a collection built by a swap that did not complete.
    async fn discard_collection(&self, name: &str) {
        match self.client.delete_collection(name).await {
            Ok(()) => info!(collection = %name, "Deleted unused collection"),
            Err(e) => error!(collection = %name, error = %e, "Failed to delete unused collection"),
        }
    }

    /// Delete the collection if it exists. Never fails the load.
    async fn reset_collection(&mut self, name: &str) {
        match self.client.delete_collection(name).await {
            Ok(()) => info!(collection = %name, "Deleted old collection"),
            Err(e) if e.is_not_found() => {
                info!(collection = %name, "No existing collection found, creating a new one")
            }
            Err(e) => warn!(collection = %name, error = %e, "Failed to delete old collection"),
        }
        self.state = LoaderState::CollectionReset;
    }

    async fn create_collection(&mut self, name: &str) -> Result<(), PipelineError> {
        let schema = video_collection_schema(name);

        self.client
            .create_collection(&schema)
            .await
            .map_err(|e| PipelineError::loader(format!("Failed to create collection {}: {}", name, e)))?;

        self.state = LoaderState::CollectionCreated;
        info!(collection = %name, "Created new collection");
        Ok(())
    }

    /// Import all documents batch by batch.
    ///
    /// A batch whose request fails outright counts every one of its
    /// documents as failed.
    async fn import(&mut self, collection: &str, documents: &[SearchDocument]) -> (ImportSummary, usize) {
        self.state = LoaderState::Importing;

        let mut summary = ImportSummary::default();
        if documents.is_empty() {
            info!("No documents to import");
            return (summary, 0);
        }

        info!(
            count = documents.len(),
            batch_size = self.config.batch_size,
            action = %self.config.action,
            "Starting import of {} documents",
            documents.len()
        );

        let mut batches = 0;
        for batch in documents.chunks(self.config.batch_size) {
            batches += 1;
            match self
                .client
                .import_documents(collection, batch, self.config.action)
                .await
            {
                Ok(mut results) => {
                    if results.len() < batch.len() {
                        let missing = batch.len() - results.len();
                        results.extend(
                            (0..missing).map(|_| ImportResult::failed("No import result returned")),
                        );
                    }
                    summary.record(results);
                }
                Err(e) => {
                    error!(batch = batches, error = %e, count = batch.len(), "Import request failed");
                    summary.record(
                        batch
                            .iter()
                            .map(|_| ImportResult::failed(e.to_string()))
                            .collect(),
                    );
                }
            }
            debug!(batch = batches, imported = summary.total, "Imported batch");
        }

        (summary, batches)
    }

    fn log_report(report: &LoadReport) {
        let summary = &report.summary;
        if summary.has_failures() {
            error!(
                collection = %report.collection,
                failed = summary.failed,
                succeeded = summary.succeeded,
                "Failed to import {} documents",
                summary.failed
            );
            if let Some(first) = &summary.first_failure {
                error!(
                    error = first.error.as_deref().unwrap_or("unknown"),
                    document = first.document.as_deref().unwrap_or(""),
                    "First import failure"
                );
            }
        } else {
            info!(
                collection = %report.collection,
                count = summary.succeeded,
                "All documents indexed"
            );
        }
    }
}

/// Name of the collection built behind `alias` at the given unix time in
/// milliseconds.
pub fn versioned_name(alias: &str, unix_millis: i64) -> String {
    format!("{}_{}", alias, unix_millis)
}

/// Versioned name for the next swap, never equal to the current target.
pub fn next_collection_name(alias: &str, current: Option<&str>, unix_millis: i64) -> String {
    let name = versioned_name(alias, unix_millis);
    if current == Some(name.as_str()) {
        versioned_name(alias, unix_millis + 1)
    } else {
        name
    }
}
