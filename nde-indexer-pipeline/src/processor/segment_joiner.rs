//! Segment joiner implementation.
//!
//! Joins transcript segments with their video metadata into SearchDocument
//! structures for indexing.

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};

use nde_indexer_shared::document::parse_date_seconds;
use nde_indexer_shared::{SearchDocument, TranscriptSegment, VideoRecord};

/// Counts describing one join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinStats {
    /// Distinct video identifiers in the lookup.
    pub videos: usize,
    /// Segments offered to the join.
    pub segments: usize,
    /// Documents produced.
    pub documents: usize,
    /// Segments without a matching video.
    pub dropped: usize,
}

/// Documents produced by a join, in segment order.
#[derive(Debug, Clone, Default)]
pub struct JoinOutput {
    pub documents: Vec<SearchDocument>,
    pub stats: JoinStats,
}

/// Processor that turns segments into search documents.
///
/// The processor is responsible for:
/// - Building the video lookup keyed by video identifier
/// - Dropping segments whose video is unknown
/// - Normalizing view counts and publish dates
#[derive(Debug, Default)]
pub struct SegmentJoiner {}

impl SegmentJoiner {
    /// Create a new segment joiner.
    pub fn new() -> Self {
        Self {}
    }

    /// Index videos by identifier. A later record replaces an earlier one
    /// with the same identifier; records without an identifier are skipped.
    pub fn build_lookup(videos: Vec<VideoRecord>) -> HashMap<String, VideoRecord> {
        let mut lookup = HashMap::with_capacity(videos.len());
        let mut unkeyed = 0;

        for video in videos {
            let Some(video_id) = video.video_id.clone() else {
                unkeyed += 1;
                continue;
            };
            if let Some(raw) = video.date.as_deref() {
                if !raw.trim().is_empty() && parse_date_seconds(raw).is_none() {
                    warn!(
                        video_id = %video_id,
                        date = %raw,
                        "Unparseable publish date, indexing as 0"
                    );
                }
            }
            lookup.insert(video_id, video);
        }

        if unkeyed > 0 {
            warn!(skipped = unkeyed, "Skipped videos without an identifier");
        }

        lookup
    }

    /// Join segments with their videos.
    ///
    /// # Arguments
    ///
    /// * `videos` - The video metadata rows
    /// * `segments` - The transcript segment rows
    ///
    /// # Returns
    ///
    /// One document per segment whose video is known, in segment order.
    #[instrument(skip_all, fields(videos = videos.len(), segments = segments.len()))]
    pub fn join(&self, videos: Vec<VideoRecord>, segments: Vec<TranscriptSegment>) -> JoinOutput {
        let lookup = Self::build_lookup(videos);
        info!("Created a lookup map with {} videos", lookup.len());

        let segment_count = segments.len();
        let documents: Vec<SearchDocument> = segments
            .into_iter()
            .filter_map(|segment| self.process_segment(&lookup, segment))
            .collect();

        let stats = JoinStats {
            videos: lookup.len(),
            segments: segment_count,
            documents: documents.len(),
            dropped: segment_count - documents.len(),
        };

        if stats.dropped > 0 {
            info!(dropped = stats.dropped, "Dropped segments without a matching video");
        }
        debug!(documents = stats.documents, "Joined segments");

        JoinOutput { documents, stats }
    }

    /// Join a single segment. Segments without a video identifier never
    /// match.
    fn process_segment(
        &self,
        lookup: &HashMap<String, VideoRecord>,
        segment: TranscriptSegment,
    ) -> Option<SearchDocument> {
        let video = lookup.get(segment.video_id.as_deref()?)?;
        Some(SearchDocument::join(video, segment))
    }
}
