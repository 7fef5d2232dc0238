//! Dependency initialization and wiring for the indexer.

use std::sync::Arc;
use tracing::info;

use crate::config::{IndexerConfig, SearchConfig};
use crate::IndexingError;
use nde_indexer_pipeline::{CollectionLoader, Orchestrator, SegmentJoiner, TableExtractor};
use nde_indexer_repository::{SearchIndexProvider, SupabaseClient, TypesenseClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Build the reindex pipeline from a validated configuration.
    ///
    /// No request is sent here; the first I/O happens when the
    /// orchestrator runs.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If a client cannot be built
    pub fn new(config: &IndexerConfig) -> Result<Self, IndexingError> {
        info!(
            supabase_url = %config.supabase.url,
            typesense_url = %config.search.typesense.base_url(),
            collection = %config.search.collection,
            profile = %config.profile,
            action = %config.action,
            batch_size = config.batch_size,
            reset_mode = %config.reset_mode,
            "Initializing dependencies"
        );

        let source = SupabaseClient::new(&config.supabase)?;
        let search_client = Self::search_client(&config.search)?;

        let extractor = TableExtractor::with_config(Arc::new(source), config.extractor_config());
        let processor = SegmentJoiner::new();
        let loader = CollectionLoader::with_config(search_client, config.loader_config());

        let orchestrator = Orchestrator::new(extractor, processor, loader);

        Ok(Self { orchestrator })
    }

    /// Build a search client for the read-path commands.
    pub fn search_client(config: &SearchConfig) -> Result<Arc<dyn SearchIndexProvider>, IndexingError> {
        let client = TypesenseClient::new(&config.typesense)?;
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Overrides;
    use std::collections::HashMap;

    fn config(supabase_url: &str) -> IndexerConfig {
        let vars: HashMap<&str, &str> = [
            ("NEXT_PUBLIC_SUPABASE_URL", supabase_url),
            ("SUPABASE_SERVICE_KEY", "service"),
            ("TYPESENSE_HOST", "localhost"),
            ("TYPESENSE_API_KEY", "xyz"),
        ]
        .into_iter()
        .collect();
        IndexerConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()), &Overrides::default())
            .unwrap()
    }

    #[test]
    fn test_wiring_does_not_need_network() {
        assert!(Dependencies::new(&config("https://xyz.supabase.co")).is_ok());
    }

    #[test]
    fn test_unusable_supabase_url_is_rejected() {
        let result = Dependencies::new(&config("not a url"));

        assert!(matches!(result, Err(IndexingError::SourceError(_))));
    }
}
