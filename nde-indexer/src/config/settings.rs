//! Indexer settings read from the environment.
//!
//! Settings are resolved in order: command-line override, environment
//! variable, import profile, built-in default. Everything is validated here
//! so that a bad value fails the run before any request is sent.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use nde_indexer_pipeline::{ExtractorConfig, LoaderConfig, ResetMode};
use nde_indexer_repository::config::{
    DEFAULT_PAGE_SIZE, DEFAULT_TYPESENSE_PORT, DEFAULT_TYPESENSE_PROTOCOL,
};
use nde_indexer_repository::typesense::COLLECTION_NAME;
use nde_indexer_repository::{ImportAction, SupabaseConfig, TypesenseConfig};

use crate::IndexingError;

/// Variables naming the Supabase project URL, in order of preference.
pub const SUPABASE_URL_VARS: &[&str] = &["NEXT_PUBLIC_SUPABASE_URL", "SUPABASE_URL"];
pub const SUPABASE_SERVICE_KEY_VAR: &str = "SUPABASE_SERVICE_KEY";
pub const TYPESENSE_HOST_VAR: &str = "TYPESENSE_HOST";
pub const TYPESENSE_API_KEY_VAR: &str = "TYPESENSE_API_KEY";

/// Preset import behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportProfile {
    /// Upsert in large batches with a long timeout.
    #[default]
    Upsert,
    /// Create in small batches with a short timeout.
    Recreate,
}

impl ImportProfile {
    pub fn action(self) -> ImportAction {
        match self {
            Self::Upsert => ImportAction::Upsert,
            Self::Recreate => ImportAction::Create,
        }
    }

    pub fn batch_size(self) -> usize {
        match self {
            Self::Upsert => 2000,
            Self::Recreate => 100,
        }
    }

    pub fn timeout(self) -> Duration {
        match self {
            Self::Upsert => Duration::from_secs(60),
            Self::Recreate => Duration::from_secs(5),
        }
    }
}

impl fmt::Display for ImportProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upsert => f.write_str("upsert"),
            Self::Recreate => f.write_str("recreate"),
        }
    }
}

impl FromStr for ImportProfile {
    type Err = IndexingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upsert" => Ok(Self::Upsert),
            "recreate" => Ok(Self::Recreate),
            other => Err(IndexingError::config(format!(
                "Unknown import profile '{}' (expected upsert or recreate)",
                other
            ))),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT`, defaulting to text.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match non_empty(&lookup, "LOG_FORMAT") {
            None => Ok(Self::Text),
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "text" => Ok(Self::Text),
                "json" => Ok(Self::Json),
                _ => Err(invalid("LOG_FORMAT", &value)),
            },
        }
    }

    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|name| env::var(name).ok())
    }
}

/// Settings given on the command line. Each one beats its environment
/// variable.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub action: Option<String>,
    pub batch_size: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub reset_mode: Option<String>,
    pub page_size: Option<usize>,
    pub collection: Option<String>,
}

/// Settings needed to talk to the search node.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub typesense: TypesenseConfig,
    /// Destination collection, or the alias in alias-swap mode.
    pub collection: String,
}

impl SearchConfig {
    /// Resolve the search-node settings.
    ///
    /// Only `TYPESENSE_HOST` and `TYPESENSE_API_KEY` are required.
    pub fn from_lookup<F>(lookup: F, overrides: &Overrides) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let host = required(&lookup, &[TYPESENSE_HOST_VAR], &mut missing);
        let api_key = required(&lookup, &[TYPESENSE_API_KEY_VAR], &mut missing);
        let (host, api_key) = match (host, api_key) {
            (Some(host), Some(api_key)) => (host, api_key),
            _ => return Err(missing_error(&missing)),
        };

        Self::build(&lookup, overrides, host, api_key)
    }

    pub fn from_env(overrides: &Overrides) -> Result<Self, IndexingError> {
        Self::from_lookup(|name| env::var(name).ok(), overrides)
    }

    fn build<F>(lookup: &F, overrides: &Overrides, host: String, api_key: String) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = resolve_profile(lookup, overrides)?;

        let port = parse_var(lookup, "TYPESENSE_PORT")?.unwrap_or(DEFAULT_TYPESENSE_PORT);
        let protocol = non_empty(lookup, "TYPESENSE_PROTOCOL")
            .unwrap_or_else(|| DEFAULT_TYPESENSE_PROTOCOL.to_string())
            .to_ascii_lowercase();
        if protocol != "http" && protocol != "https" {
            return Err(invalid("TYPESENSE_PROTOCOL", &protocol));
        }

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => Some(secs),
            None => parse_var::<u64, _>(lookup, "TYPESENSE_TIMEOUT_SECS")?,
        };
        let timeout = match timeout_secs {
            Some(0) => return Err(IndexingError::config("TYPESENSE_TIMEOUT_SECS must be greater than zero")),
            Some(secs) => Duration::from_secs(secs),
            None => profile.timeout(),
        };

        let collection = overrides
            .collection
            .clone()
            .filter(|c| !c.trim().is_empty())
            .or_else(|| non_empty(lookup, "TYPESENSE_COLLECTION"))
            .unwrap_or_else(|| COLLECTION_NAME.to_string());

        let typesense = TypesenseConfig::new(host, api_key)
            .with_port(port)
            .with_protocol(protocol)
            .with_timeout(timeout);

        Ok(Self {
            typesense,
            collection,
        })
    }
}

/// Everything a reindex run needs.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub supabase: SupabaseConfig,
    pub search: SearchConfig,
    pub profile: ImportProfile,
    pub page_size: usize,
    pub action: ImportAction,
    pub batch_size: usize,
    pub reset_mode: ResetMode,
}

impl IndexerConfig {
    /// Resolve the reindex settings.
    ///
    /// All missing required variables are reported together, by name.
    pub fn from_lookup<F>(lookup: F, overrides: &Overrides) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let url = required(&lookup, SUPABASE_URL_VARS, &mut missing);
        let service_key = required(&lookup, &[SUPABASE_SERVICE_KEY_VAR], &mut missing);
        let host = required(&lookup, &[TYPESENSE_HOST_VAR], &mut missing);
        let api_key = required(&lookup, &[TYPESENSE_API_KEY_VAR], &mut missing);

        let (url, service_key, host, api_key) = match (url, service_key, host, api_key) {
            (Some(url), Some(service_key), Some(host), Some(api_key)) => {
                (url, service_key, host, api_key)
            }
            _ => return Err(missing_error(&missing)),
        };

        let profile = resolve_profile(&lookup, overrides)?;
        let search = SearchConfig::build(&lookup, overrides, host, api_key)?;

        let action = match overrides.action.clone().or_else(|| non_empty(&lookup, "IMPORT_ACTION")) {
            Some(value) => value
                .parse::<ImportAction>()
                .map_err(|_| invalid("IMPORT_ACTION", &value))?,
            None => profile.action(),
        };

        let batch_size = match overrides.batch_size {
            Some(size) => size,
            None => parse_var(&lookup, "IMPORT_BATCH_SIZE")?.unwrap_or_else(|| profile.batch_size()),
        };
        if batch_size == 0 {
            return Err(IndexingError::config("IMPORT_BATCH_SIZE must be greater than zero"));
        }

        let page_size = match overrides.page_size {
            Some(size) => size,
            None => parse_var(&lookup, "SUPABASE_PAGE_SIZE")?.unwrap_or(DEFAULT_PAGE_SIZE),
        };
        if page_size == 0 {
            return Err(IndexingError::config("SUPABASE_PAGE_SIZE must be greater than zero"));
        }

        let reset_mode = match overrides.reset_mode.clone().or_else(|| non_empty(&lookup, "RESET_MODE")) {
            Some(value) => value
                .parse::<ResetMode>()
                .map_err(|_| invalid("RESET_MODE", &value))?,
            None => ResetMode::Recreate,
        };

        Ok(Self {
            supabase: SupabaseConfig::new(url, service_key),
            search,
            profile,
            page_size,
            action,
            batch_size,
            reset_mode,
        })
    }

    pub fn from_env(overrides: &Overrides) -> Result<Self, IndexingError> {
        Self::from_lookup(|name| env::var(name).ok(), overrides)
    }

    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            page_size: self.page_size,
        }
    }

    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            collection: self.search.collection.clone(),
            action: self.action,
            batch_size: self.batch_size,
            reset_mode: self.reset_mode,
        }
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// First set variable among `names`; records the first name as missing
/// when none is set.
fn required<F>(lookup: &F, names: &[&str], missing: &mut Vec<String>) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let value = names.iter().find_map(|name| non_empty(lookup, name));
    if value.is_none() {
        if let Some(name) = names.first() {
            missing.push(name.to_string());
        }
    }
    value
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>, IndexingError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, name) {
        None => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|_| invalid(name, &value)),
    }
}

fn resolve_profile<F>(lookup: &F, overrides: &Overrides) -> Result<ImportProfile, IndexingError>
where
    F: Fn(&str) -> Option<String>,
{
    match overrides.profile.clone().or_else(|| non_empty(lookup, "IMPORT_PROFILE")) {
        Some(value) => value.parse(),
        None => Ok(ImportProfile::default()),
    }
}

fn invalid(name: &str, value: &str) -> IndexingError {
    IndexingError::config(format!("Invalid value for {}: '{}'", name, value))
}

fn missing_error(missing: &[String]) -> IndexingError {
    IndexingError::config(format!(
        "Missing required environment variables: {}",
        missing.join(", ")
    ))
}
