//! Supabase client implementation.
//!
//! Reads table rows through PostgREST (`/rest/v1/{table}`) using the
//! project's service-role key.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::config::SupabaseConfig;
use crate::errors::SourceError;
use crate::interfaces::RowSource;

/// PostgREST error payload.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
}

/// Row source backed by a Supabase project.
pub struct SupabaseClient {
    client: Client,
    rest_url: Url,
}

impl SupabaseClient {
    /// Create a new client for the configured project.
    ///
    /// # Returns
    ///
    /// * `Ok(SupabaseClient)` - A new client instance
    /// * `Err(SourceError)` - If the URL or key is unusable
    pub fn new(config: &SupabaseConfig) -> Result<Self, SourceError> {
        let project_url = Url::parse(config.url.trim())
            .map_err(|e| SourceError::config(format!("Invalid Supabase URL {}: {}", config.url, e)))?;
        let rest_url = Self::rest_root(&project_url)?;

        let key = config.service_key.expose_secret();
        let mut api_key = HeaderValue::from_str(key)
            .map_err(|e| SourceError::config(format!("Invalid Supabase service key: {}", e)))?;
        api_key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", key))
            .map_err(|e| SourceError::config(format!("Invalid Supabase service key: {}", e)))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SourceError::connection(e.to_string()))?;

        info!(url = %rest_url, "Created Supabase client");

        Ok(Self { client, rest_url })
    }

    /// `{project}/rest/v1`, keeping any path prefix the project URL carries.
    fn rest_root(project_url: &Url) -> Result<Url, SourceError> {
        let mut url = project_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                SourceError::config(format!("{} cannot be used as a base URL", project_url))
            })?;
            path.pop_if_empty().extend(["rest", "v1"]);
        }
        Ok(url)
    }

    fn table_url(&self, table: &str) -> Result<Url, SourceError> {
        let mut url = self.rest_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::config(format!("{} cannot be used as a base URL", self.rest_url)))?
            .push(table);
        Ok(url)
    }
}

/// Strip whitespace around column names, as PostgREST rejects it.
fn compact_select(columns: &str) -> String {
    columns
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl RowSource for SupabaseClient {
    async fn fetch_range(
        &self,
        table: &str,
        columns: &str,
        from: usize,
        to: usize,
    ) -> Result<Vec<Value>, SourceError> {
        if to < from {
            return Err(SourceError::config(format!(
                "Invalid range {}..={} for {}",
                from, to, table
            )));
        }
        let limit = to - from + 1;
        let select = compact_select(columns);

        let response = self
            .client
            .get(self.table_url(table)?)
            .query(&[
                ("select", select),
                ("offset", from.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<PostgrestError>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            error!(table = %table, status = %status, message = %message, "Range read failed");
            return Err(SourceError::fetch(table, status.as_u16(), message));
        }

        let rows = response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| SourceError::decode(table, e.to_string()))?;

        debug!(table = %table, from, to, rows = rows.len(), "Fetched range");
        Ok(rows)
    }
}
