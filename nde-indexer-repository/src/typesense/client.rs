//! Typesense client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! on top of the Typesense HTTP API.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::TypesenseConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::{parse_import_response, ImportAction, ImportResult};
use crate::typesense::queries::build_search_params;
use crate::typesense::schema::CollectionSchema;
use nde_indexer_shared::{SearchDocument, SearchQuery, SearchResponse};

/// Header carrying the Typesense API key.
const API_KEY_HEADER: &str = "x-typesense-api-key";

/// Typesense client implementation.
///
/// # Example
///
/// ```ignore
/// use nde_indexer_repository::config::TypesenseConfig;
/// let config = TypesenseConfig::new("localhost", "xyz");
/// let client = TypesenseClient::new(&config)?;
///
/// let schema = video_collection_schema(COLLECTION_NAME);
/// client.create_collection(&schema).await?;
/// ```
pub struct TypesenseClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    ok: bool,
}

#[derive(Debug, Deserialize)]
struct AliasBody {
    collection_name: String,
}

impl TypesenseClient {
    /// Create a new Typesense client for the configured node.
    ///
    /// # Returns
    ///
    /// * `Ok(TypesenseClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If the URL or API key is unusable
    pub fn new(config: &TypesenseConfig) -> Result<Self, SearchIndexError> {
        let base_url = Url::parse(&config.base_url()).map_err(|e| {
            SearchIndexError::connection(format!("Invalid Typesense URL {}: {}", config.base_url(), e))
        })?;

        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| SearchIndexError::validation(format!("Invalid Typesense API key: {}", e)))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        let client = Client::builder()
            .timeout(config.connection_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        info!(
            url = %base_url,
            timeout_secs = config.connection_timeout.as_secs(),
            "Created Typesense client"
        );

        Ok(Self { client, base_url })
    }

    /// Build an endpoint URL from escaped path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SearchIndexError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                SearchIndexError::connection(format!("{} cannot be used as a base URL", self.base_url))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Read the error message out of a failed response.
    async fn error_message(response: Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.message,
            Err(_) if body.is_empty() => status.to_string(),
            Err(_) => body,
        }
    }

    /// Serialize documents as a JSON-lines import body.
    fn import_body(documents: &[SearchDocument]) -> Result<String, SearchIndexError> {
        let lines = documents
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SearchIndexError::import(format!("Failed to serialize document: {}", e)))?;
        Ok(lines.join("\n"))
    }
}

#[async_trait]
impl SearchIndexProvider for TypesenseClient {
    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .get(self.endpoint(&["health"])?)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<HealthBody>(&body) {
            Ok(health) => Ok(health.ok && status.is_success()),
            Err(_) => {
                warn!(status = %status, body = %body, "Unexpected health response");
                Ok(false)
            }
        }
    }

    /// Delete a collection.
    ///
    /// A missing collection is reported as `CollectionNotFound` so callers can
    /// decide whether that matters.
    #[instrument(skip(self))]
    async fn delete_collection(&self, name: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .delete(self.endpoint(&["collections", name])?)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SearchIndexError::collection_not_found(name));
        }
        if !status.is_success() {
            let message = Self::error_message(response).await;
            error!(status = %status, message = %message, "Delete collection failed");
            return Err(SearchIndexError::collection(format!(
                "Delete of {} failed with status {}: {}",
                name, status, message
            )));
        }

        debug!(collection = %name, "Collection deleted");
        Ok(())
    }

    #[instrument(skip(self, schema), fields(collection = %schema.name))]
    async fn create_collection(&self, schema: &CollectionSchema) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .post(self.endpoint(&["collections"])?)
            .json(schema)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response).await;
            error!(status = %status, message = %message, "Create collection failed");
            return Err(SearchIndexError::collection(format!(
                "Create of {} failed with status {}: {}",
                schema.name, status, message
            )));
        }

        debug!("Collection created");
        Ok(())
    }

    /// Import documents as one JSON-lines request.
    ///
    /// The endpoint answers 200 even when individual documents are rejected;
    /// those come back as `success: false` entries.
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn import_documents(
        &self,
        collection: &str,
        documents: &[SearchDocument],
        action: ImportAction,
    ) -> Result<Vec<ImportResult>, SearchIndexError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let body = Self::import_body(documents)?;

        let response = self
            .client
            .post(self.endpoint(&["collections", collection, "documents", "import"])?)
            .query(&[
                ("action", action.as_str().to_string()),
                ("batch_size", documents.len().to_string()),
            ])
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response).await;
            error!(status = %status, message = %message, "Import request failed");
            return Err(SearchIndexError::import(format!(
                "Import into {} failed with status {}: {}",
                collection, status, message
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;
        let results = parse_import_response(&text)?;

        if results.len() != documents.len() {
            warn!(
                sent = documents.len(),
                received = results.len(),
                "Import result count does not match document count"
            );
        }

        Ok(results)
    }

    #[instrument(skip(self, query), fields(q = %query.query))]
    async fn search(
        &self,
        collection: &str,
        query: &SearchQuery,
    ) -> Result<SearchResponse, SearchIndexError> {
        let params = build_search_params(query)?;

        let response = self
            .client
            .get(self.endpoint(&["collections", collection, "documents", "search"])?)
            .query(&params)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SearchIndexError::collection_not_found(collection));
        }
        if !status.is_success() {
            let message = Self::error_message(response).await;
            return Err(SearchIndexError::query(format!(
                "Search failed with status {}: {}",
                status, message
            )));
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))
    }

    async fn get_alias(&self, alias: &str) -> Result<Option<String>, SearchIndexError> {
        let response = self
            .client
            .get(self.endpoint(&["aliases", alias])?)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let message = Self::error_message(response).await;
            return Err(SearchIndexError::collection(format!(
                "Alias lookup of {} failed with status {}: {}",
                alias, status, message
            )));
        }

        let body = response
            .json::<AliasBody>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;
        Ok(Some(body.collection_name))
    }

    #[instrument(skip(self))]
    async fn upsert_alias(&self, alias: &str, collection: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .put(self.endpoint(&["aliases", alias])?)
            .json(&json!({ "collection_name": collection }))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response).await;
            error!(status = %status, message = %message, "Alias update failed");
            return Err(SearchIndexError::collection(format!(
                "Pointing alias {} at {} failed with status {}: {}",
                alias, collection, status, message
            )));
        }

        info!(alias = %alias, collection = %collection, "Alias updated");
        Ok(())
    }
}
