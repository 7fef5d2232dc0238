//! Relational source trait definition.
//!
//! This module defines the abstract interface for reading table rows,
//! allowing the extractor to run against Supabase or an in-memory fake.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SourceError;

/// Abstract interface for range reads over a relational table.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Read the rows at positions `from..=to` of a table.
    ///
    /// # Arguments
    ///
    /// * `table` - Table name, e.g. `nde_vids`
    /// * `columns` - Comma-separated column selection
    /// * `from` - Zero-based position of the first row
    /// * `to` - Position of the last row, inclusive
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Value>)` - Up to `to - from + 1` rows as JSON objects; fewer
    ///   (or none) once the end of the table is reached
    /// * `Err(SourceError)` - If the read fails
    async fn fetch_range(
        &self,
        table: &str,
        columns: &str,
        from: usize,
        to: usize,
    ) -> Result<Vec<Value>, SourceError>;
}
