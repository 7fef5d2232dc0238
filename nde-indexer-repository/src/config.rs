//! Connection settings for the relational source and the search node.

use std::time::Duration;

use secrecy::SecretString;

/// Default Typesense API port.
pub const DEFAULT_TYPESENSE_PORT: u16 = 8108;

/// Default Typesense protocol.
pub const DEFAULT_TYPESENSE_PROTOCOL: &str = "http";

/// Maximum number of rows PostgREST returns per request by default.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Connection settings for a single Typesense node.
#[derive(Debug, Clone)]
pub struct TypesenseConfig {
    pub host: String,
    pub port: u16,
    /// `http` or `https`.
    pub protocol: String,
    pub api_key: SecretString,
    /// Per-request timeout.
    pub connection_timeout: Duration,
}

impl TypesenseConfig {
    /// Create a config for `http://{host}:8108` with a 60 second timeout.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_TYPESENSE_PORT,
            protocol: DEFAULT_TYPESENSE_PROTOCOL.to_string(),
            api_key: SecretString::from(api_key.into()),
            connection_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Base URL of the node, e.g. `http://localhost:8108`.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// Connection settings for the Supabase REST endpoint.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Service-role key; bypasses row level security.
    pub service_key: SecretString,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_key: SecretString::from(service_key.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typesense_defaults() {
        let config = TypesenseConfig::new("search.internal", "xyz");

        assert_eq!(config.base_url(), "http://search.internal:8108");
        assert_eq!(config.connection_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_typesense_overrides() {
        let config = TypesenseConfig::new("search.internal", "xyz")
            .with_port(443)
            .with_protocol("https")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.base_url(), "https://search.internal:443");
        assert_eq!(config.connection_timeout, Duration::from_secs(5));
    }
}
