//! Paginated table extractor.
//!
//! Reads whole tables from the relational store one fixed-size page at a
//! time and decodes the rows into typed records.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::errors::PipelineError;
use crate::extractor::tables::{SEGMENTS_TABLE, SEGMENT_COLUMNS, VIDEOS_TABLE, VIDEO_COLUMNS};
use nde_indexer_repository::config::DEFAULT_PAGE_SIZE;
use nde_indexer_repository::{RowSource, SourceError};
use nde_indexer_shared::{TranscriptSegment, VideoRecord};

/// Configuration for the table extractor.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Rows requested per range read.
    pub page_size: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Extractor that reads complete tables through range reads.
pub struct TableExtractor {
    source: Arc<dyn RowSource>,
    config: ExtractorConfig,
}

impl TableExtractor {
    /// Create a new extractor with the default page size.
    pub fn new(source: Arc<dyn RowSource>) -> Self {
        Self {
            source,
            config: ExtractorConfig::default(),
        }
    }

    /// Create a new extractor with custom configuration.
    pub fn with_config(source: Arc<dyn RowSource>, config: ExtractorConfig) -> Self {
        Self { source, config }
    }

    /// Read every row of a table.
    ///
    /// Pages are requested until one comes back empty or shorter than the
    /// page size. Any failed page aborts the whole read.
    #[instrument(skip(self))]
    pub async fn fetch_all_rows(&self, table: &str, columns: &str) -> Result<Vec<Value>, PipelineError> {
        let page_size = self.config.page_size;
        if page_size == 0 {
            return Err(PipelineError::config("page size must be greater than zero"));
        }

        info!("Fetching {}", table);

        let mut rows = Vec::new();
        let mut page = 0;

        loop {
            let from = page * page_size;
            let to = from + page_size - 1;

            let batch = self.source.fetch_range(table, columns, from, to).await?;
            let received = batch.len();
            if received == 0 {
                break;
            }

            rows.extend(batch);
            info!(rows_loaded = rows.len(), "Loaded {} rows from {}", rows.len(), table);

            if received < page_size {
                break;
            }
            page += 1;
        }

        debug!(pages = page + 1, total = rows.len(), "Finished reading table");
        Ok(rows)
    }

    /// Read every row of a table and decode it into `T`.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        table: &str,
        columns: &str,
    ) -> Result<Vec<T>, PipelineError> {
        let rows = self.fetch_all_rows(table, columns).await?;

        rows.into_iter()
            .enumerate()
            .map(|(index, row)| {
                serde_json::from_value(row).map_err(|e| {
                    PipelineError::from(SourceError::decode(
                        table,
                        format!("row {}: {}", index, e),
                    ))
                })
            })
            .collect()
    }

    /// Read the whole video metadata table.
    pub async fn fetch_videos(&self) -> Result<Vec<VideoRecord>, PipelineError> {
        self.fetch_all(VIDEOS_TABLE, VIDEO_COLUMNS).await
    }

    /// Read the whole transcript segment table.
    pub async fn fetch_segments(&self) -> Result<Vec<TranscriptSegment>, PipelineError> {
        self.fetch_all(SEGMENTS_TABLE, SEGMENT_COLUMNS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRowSource;
    use serde_json::json;

    fn numbered_rows(count: usize) -> Vec<Value> {
        (0..count).map(|i| json!({ "n": i })).collect()
    }

    fn extractor(source: Arc<FakeRowSource>, page_size: usize) -> TableExtractor {
        TableExtractor::with_config(source, ExtractorConfig { page_size })
    }

    #[tokio::test]
    async fn test_stops_on_short_page() {
        let source = Arc::new(FakeRowSource::new().with_table("t", numbered_rows(2500)));

        let rows = extractor(source.clone(), 1000)
            .fetch_all_rows("t", "*")
            .await
            .unwrap();

        assert_eq!(rows.len(), 2500);
        assert_eq!(rows[2499]["n"], 2499);
        assert_eq!(
            source.calls_for("t"),
            vec![(0, 999), (1000, 1999), (2000, 2999)]
        );
    }

    #[tokio::test]
    async fn test_exact_multiple_reads_one_empty_page() {
        let source = Arc::new(FakeRowSource::new().with_table("t", numbered_rows(20)));

        let rows = extractor(source.clone(), 10)
            .fetch_all_rows("t", "*")
            .await
            .unwrap();

        assert_eq!(rows.len(), 20);
        assert_eq!(source.calls_for("t"), vec![(0, 9), (10, 19), (20, 29)]);
    }

    #[tokio::test]
    async fn test_pages_match_single_read() {
        let all = numbered_rows(37);
        let source = Arc::new(FakeRowSource::new().with_table("t", all.clone()));

        for page_size in [1, 5, 36, 37, 38, 1000] {
            let rows = extractor(source.clone(), page_size)
                .fetch_all_rows("t", "*")
                .await
                .unwrap();
            assert_eq!(rows, all, "page size {}", page_size);
        }
    }

    #[tokio::test]
    async fn test_empty_table() {
        let source = Arc::new(FakeRowSource::new());

        let rows = extractor(source.clone(), 1000)
            .fetch_all_rows("t", "*")
            .await
            .unwrap();

        assert!(rows.is_empty());
        assert_eq!(source.calls_for("t"), vec![(0, 999)]);
    }

    #[tokio::test]
    async fn test_failed_page_aborts() {
        let source = Arc::new(
            FakeRowSource::new()
                .with_table("t", numbered_rows(25))
                .failing_at("t", 10),
        );

        let result = extractor(source.clone(), 10).fetch_all_rows("t", "*").await;

        assert!(matches!(
            result,
            Err(PipelineError::ExtractorError(SourceError::FetchError { .. }))
        ));
        // No page after the failed one is requested.
        assert_eq!(source.calls_for("t"), vec![(0, 9), (10, 19)]);
    }

    #[tokio::test]
    async fn test_zero_page_size_rejected() {
        let source = Arc::new(FakeRowSource::new());

        let result = extractor(source.clone(), 0).fetch_all_rows("t", "*").await;

        assert!(matches!(result, Err(PipelineError::ConfigError(_))));
        assert!(source.calls_for("t").is_empty());
    }

    #[tokio::test]
    async fn test_fetch_typed_records() {
        let source = Arc::new(
            FakeRowSource::new()
                .with_table(
                    VIDEOS_TABLE,
                    vec![json!({ "videoId": "v1", "title": "A", "viewCount": 10 })],
                )
                .with_table(
                    SEGMENTS_TABLE,
                    vec![json!({ "content": "hello", "start_time": 1.5, "video_id": "v1" })],
                ),
        );
        let extractor = TableExtractor::new(source);

        let videos = extractor.fetch_videos().await.unwrap();
        let segments = extractor.fetch_segments().await.unwrap();

        assert_eq!(videos[0].view_count, Some(10));
        assert_eq!(segments[0], TranscriptSegment::new("v1", "hello", 1.5));
    }

    #[tokio::test]
    async fn test_null_video_id_is_decoded() {
        let source = Arc::new(FakeRowSource::new().with_table(
            SEGMENTS_TABLE,
            vec![
                json!({ "content": "hello", "start_time": 1.5, "video_id": "v1" }),
                json!({ "content": "no video id", "start_time": 1.0, "video_id": null }),
            ],
        ));

        let segments = TableExtractor::new(source).fetch_segments().await.unwrap();

        assert_eq!(segments.len(), 2);
        assert!(segments[1].video_id.is_none());
    }

    #[tokio::test]
    async fn test_mistyped_row_is_fatal() {
        let source = Arc::new(FakeRowSource::new().with_table(
            VIDEOS_TABLE,
            vec![json!({ "videoId": "v1", "viewCount": "many" })],
        ));

        let result = TableExtractor::new(source).fetch_videos().await;

        assert!(matches!(
            result,
            Err(PipelineError::ExtractorError(SourceError::DecodeError { .. }))
        ));
    }
}
