//! In-memory fakes of the external services for pipeline tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use nde_indexer_repository::{
    CollectionSchema, ImportAction, ImportResult, RowSource, SearchIndexError,
    SearchIndexProvider, SourceError,
};
use nde_indexer_shared::{SearchDocument, SearchQuery, SearchResponse};

/// Row source serving fixed tables, recording every range it is asked for.
#[derive(Default)]
pub struct FakeRowSource {
    tables: HashMap<String, Vec<Value>>,
    /// Fail the read of this table that starts at this offset.
    failure: Option<(String, usize)>,
    pub calls: Mutex<Vec<(String, usize, usize)>>,
}

impl FakeRowSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: &str, rows: Vec<Value>) -> Self {
        self.tables.insert(table.to_string(), rows);
        self
    }

    pub fn failing_at(mut self, table: &str, from: usize) -> Self {
        self.failure = Some((table.to_string(), from));
        self
    }

    pub fn calls_for(&self, table: &str) -> Vec<(usize, usize)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _, _)| t == table)
            .map(|(_, from, to)| (*from, *to))
            .collect()
    }
}

#[async_trait]
impl RowSource for FakeRowSource {
    async fn fetch_range(
        &self,
        table: &str,
        _columns: &str,
        from: usize,
        to: usize,
    ) -> Result<Vec<Value>, SourceError> {
        self.calls
            .lock()
            .unwrap()
            .push((table.to_string(), from, to));

        if let Some((failing_table, offset)) = &self.failure {
            if failing_table == table && *offset == from {
                return Err(SourceError::fetch(table, 500, "connection reset"));
            }
        }

        let rows = self.tables.get(table).cloned().unwrap_or_default();
        Ok(rows.into_iter().skip(from).take(to - from + 1).collect())
    }
}

/// Search index keeping collections and aliases in memory.
#[derive(Default)]
pub struct FakeSearchIndex {
    pub calls: Mutex<Vec<String>>,
    pub collections: Mutex<HashMap<String, Vec<SearchDocument>>>,
    pub aliases: Mutex<HashMap<String, String>>,
    pub fail_create: bool,
    pub fail_delete: bool,
    pub fail_alias_update: bool,
    pub fail_alias_lookup: bool,
    /// Collections whose deletion fails.
    pub undeletable: HashSet<String>,
    /// Import requests with this 1-based index fail as a whole.
    pub fail_import_request: Option<usize>,
    /// Documents of these videos are rejected individually.
    pub rejected_videos: HashSet<String>,
    pub import_requests: Mutex<usize>,
}

impl FakeSearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(self, name: &str, documents: Vec<SearchDocument>) -> Self {
        self.collections
            .lock()
            .unwrap()
            .insert(name.to_string(), documents);
        self
    }

    pub fn with_alias(self, alias: &str, collection: &str) -> Self {
        self.aliases
            .lock()
            .unwrap()
            .insert(alias.to_string(), collection.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn documents(&self, collection: &str) -> Option<Vec<SearchDocument>> {
        self.collections.lock().unwrap().get(collection).cloned()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    /// Resolve a name the way the search engine does: a collection with
    /// that exact name wins over an alias.
    pub fn resolve(&self, name: &str) -> String {
        if self.collections.lock().unwrap().contains_key(name) {
            return name.to_string();
        }
        self.aliases
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}

#[async_trait]
impl SearchIndexProvider for FakeSearchIndex {
    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        Ok(true)
    }

    async fn delete_collection(&self, name: &str) -> Result<(), SearchIndexError> {
        self.record(format!("delete:{}", name));
        if self.fail_delete || self.undeletable.contains(name) {
            return Err(SearchIndexError::connection("connection refused"));
        }
        match self.collections.lock().unwrap().remove(name) {
            Some(_) => Ok(()),
            None => Err(SearchIndexError::collection_not_found(name)),
        }
    }

    async fn create_collection(&self, schema: &CollectionSchema) -> Result<(), SearchIndexError> {
        self.record(format!("create:{}", schema.name));
        if self.fail_create {
            return Err(SearchIndexError::collection("Bad schema"));
        }
        let mut collections = self.collections.lock().unwrap();
        if collections.contains_key(&schema.name) {
            return Err(SearchIndexError::collection(format!(
                "A collection with name `{}` already exists.",
                schema.name
            )));
        }
        collections.insert(schema.name.clone(), Vec::new());
        Ok(())
    }

    async fn import_documents(
        &self,
        collection: &str,
        documents: &[SearchDocument],
        action: ImportAction,
    ) -> Result<Vec<ImportResult>, SearchIndexError> {
        self.record(format!("import:{}:{}:{}", collection, action, documents.len()));

        let request = {
            let mut count = self.import_requests.lock().unwrap();
            *count += 1;
            *count
        };
        if self.fail_import_request == Some(request) {
            return Err(SearchIndexError::connection("timeout"));
        }

        let target = self.resolve(collection);
        let mut collections = self.collections.lock().unwrap();
        let stored = collections
            .get_mut(&target)
            .ok_or_else(|| SearchIndexError::collection_not_found(collection))?;

        Ok(documents
            .iter()
            .map(|doc| {
                if self.rejected_videos.contains(&doc.video_id) {
                    ImportResult::failed(format!("Rejected document for {}", doc.video_id))
                } else {
                    stored.push(doc.clone());
                    ImportResult::succeeded()
                }
            })
            .collect())
    }

    async fn search(
        &self,
        _collection: &str,
        _query: &SearchQuery,
    ) -> Result<SearchResponse, SearchIndexError> {
        Ok(SearchResponse::empty())
    }

    async fn get_alias(&self, alias: &str) -> Result<Option<String>, SearchIndexError> {
        self.record(format!("get_alias:{}", alias));
        if self.fail_alias_lookup {
            return Err(SearchIndexError::connection("timeout"));
        }
        Ok(self.aliases.lock().unwrap().get(alias).cloned())
    }

    async fn upsert_alias(&self, alias: &str, collection: &str) -> Result<(), SearchIndexError> {
        self.record(format!("alias:{}->{}", alias, collection));
        if self.fail_alias_update {
            return Err(SearchIndexError::collection("alias update rejected"));
        }
        self.aliases
            .lock()
            .unwrap()
            .insert(alias.to_string(), collection.to_string());
        Ok(())
    }
}
