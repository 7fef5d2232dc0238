//! Orchestrator module for the reindex pipeline.
//!
//! Coordinates the extractor, processor, and loader components.

use tracing::{info, instrument};

use crate::errors::PipelineError;
use crate::extractor::TableExtractor;
use crate::loader::{CollectionLoader, LoadReport};
use crate::processor::{JoinStats, SegmentJoiner};

/// Outcome of a full reindex.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub join: JoinStats,
    pub load: LoadReport,
}

impl RunReport {
    /// True when every produced document was accepted by the search engine.
    pub fn is_clean(&self) -> bool {
        !self.load.summary.has_failures()
    }
}

/// Orchestrator that runs one full reindex.
///
/// The orchestrator:
/// - Reads both tables completely before touching the search engine
/// - Joins segments with their videos
/// - Hands the documents to the loader to rebuild the collection
pub struct Orchestrator {
    extractor: TableExtractor,
    processor: SegmentJoiner,
    loader: CollectionLoader,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(extractor: TableExtractor, processor: SegmentJoiner, loader: CollectionLoader) -> Self {
        Self {
            extractor,
            processor,
            loader,
        }
    }

    /// Run the pipeline once.
    ///
    /// Extraction failures abort before the collection is reset, so a
    /// failed read never leaves the search engine empty.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<RunReport, PipelineError> {
        info!("Starting reindex");

        let videos = self.extractor.fetch_videos().await?;
        info!("Loaded {} videos", videos.len());

        let segments = self.extractor.fetch_segments().await?;
        info!("Loaded {} segments", segments.len());

        let output = self.processor.join(videos, segments);
        info!("Created {} documents", output.documents.len());

        let load = self.loader.load(output.documents).await?;

        let report = RunReport {
            join: output.stats,
            load,
        };
        info!(
            documents = report.join.documents,
            imported = report.load.summary.succeeded,
            failed = report.load.summary.failed,
            "Reindex finished"
        );

        Ok(report)
    }
}
