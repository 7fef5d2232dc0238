//! Source tables and the columns read from them.

/// Video metadata table.
pub const VIDEOS_TABLE: &str = "nde_vids";

pub const VIDEO_COLUMNS: &str =
    "videoId, title, url, thumbnailUrl, date, viewCount, channelName, isNde";

/// Transcript segment table.
pub const SEGMENTS_TABLE: &str = "nde_punctuated_embeddings";

pub const SEGMENT_COLUMNS: &str = "content, start_time, video_id";
