//! Request and response types for search index operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SearchIndexError;

/// How an import treats documents that already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportAction {
    /// Fail the document if it already exists.
    Create,
    /// Create or replace the document.
    Upsert,
}

impl ImportAction {
    /// Value of the `action` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Upsert => "upsert",
        }
    }
}

impl fmt::Display for ImportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportAction {
    type Err = SearchIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "upsert" => Ok(Self::Upsert),
            other => Err(SearchIndexError::validation(format!(
                "Unknown import action '{}' (expected create or upsert)",
                other
            ))),
        }
    }
}

/// Result of importing a single document.
///
/// Mirrors one line of the import endpoint's JSON-lines response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    /// Whether the document was written.
    pub success: bool,
    /// Error message if the document was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The rejected document, as sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    /// HTTP-style status code for the rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl ImportResult {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error: None,
            document: None,
            code: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            document: None,
            code: None,
        }
    }
}

/// Summary of an import containing aggregate counts and the first failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    /// Total number of documents submitted.
    pub total: usize,
    /// Number of documents written.
    pub succeeded: usize,
    /// Number of documents rejected.
    pub failed: usize,
    /// First rejected document, if any.
    pub first_failure: Option<ImportResult>,
}

impl ImportSummary {
    /// Fold a list of per-document results into the summary.
    pub fn record(&mut self, results: Vec<ImportResult>) {
        for result in results {
            self.total += 1;
            if result.success {
                self.succeeded += 1;
            } else {
                self.failed += 1;
                if self.first_failure.is_none() {
                    self.first_failure = Some(result);
                }
            }
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Parse the JSON-lines body returned by the import endpoint.
///
/// Blank lines are ignored; any other line that is not a result object is a
/// parse error.
pub fn parse_import_response(body: &str) -> Result<Vec<ImportResult>, SearchIndexError> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            serde_json::from_str::<ImportResult>(line).map_err(|e| {
                SearchIndexError::parse(format!("Invalid import result line '{}': {}", line, e))
            })
        })
        .collect()
}
