//! Rows read from the relational store.
//!
//! Both tables are maintained by an external system; the indexer only reads
//! them. Nullable text columns stay optional so they can be passed through
//! to the search document verbatim.

use serde::{Deserialize, Serialize};

/// A row of the video metadata table (`nde_vids`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    /// Unique video identifier. Rows without one cannot be joined.
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Canonical watch URL.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Publish date as stored, e.g. `2023-01-15T00:00:00+00:00`.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub view_count: Option<i64>,
    #[serde(default)]
    pub channel_name: Option<String>,
    /// Classification of the experience (`clear_nde`, `possible_nde`, ...).
    #[serde(default)]
    pub is_nde: Option<String>,
}

impl VideoRecord {
    /// Create a record with only the identifier and title set.
    pub fn new(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            video_id: Some(video_id.into()),
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

/// A row of the transcript segment table (`nde_punctuated_embeddings`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Identifier of the parent video.
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Offset into the video, in seconds.
    #[serde(default)]
    pub start_time: Option<f64>,
}

impl TranscriptSegment {
    pub fn new(video_id: impl Into<String>, content: impl Into<String>, start_time: f64) -> Self {
        Self {
            video_id: Some(video_id.into()),
            content: Some(content.into()),
            start_time: Some(start_time),
        }
    }
}
