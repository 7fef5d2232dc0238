//! Search document type and the field normalization applied when building it.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::records::{TranscriptSegment, VideoRecord};

/// Offset-less timestamp layouts accepted for the video publish date.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// A flattened transcript segment joined with its video's metadata.
///
/// Field names on the wire match the `videos` collection schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "videoId")]
    pub video_id: String,
    #[serde(rename = "channelName")]
    pub channel_name: Option<String>,
    #[serde(rename = "isNde")]
    pub is_nde: Option<String>,
    #[serde(rename = "viewCount")]
    pub view_count: i64,
    /// Publish date in epoch seconds, 0 when unknown.
    pub date: i64,
    #[serde(rename = "thumbnailUrl")]
    pub thumbnail_url: Option<String>,
    pub url: Option<String>,
    pub start_time: Option<f64>,
}

impl SearchDocument {
    /// Build a document from a segment and the video it belongs to.
    ///
    /// Callers are responsible for matching `segment.video_id` against
    /// `video.video_id`; the segment's identifier is the one emitted, so a
    /// segment without one must not reach this point.
    pub fn join(video: &VideoRecord, segment: TranscriptSegment) -> Self {
        Self {
            title: video.title.clone(),
            content: segment.content,
            video_id: segment.video_id.unwrap_or_default(),
            channel_name: video.channel_name.clone(),
            is_nde: video.is_nde.clone(),
            view_count: normalize_view_count(video.view_count),
            date: normalize_date(video.date.as_deref()),
            thumbnail_url: video.thumbnail_url.clone(),
            url: video.url.clone(),
            start_time: segment.start_time,
        }
    }
}

/// Missing view counts are indexed as 0.
pub fn normalize_view_count(view_count: Option<i64>) -> i64 {
    view_count.unwrap_or(0)
}

/// Convert a stored publish date into epoch seconds.
///
/// Absent or blank dates and dates that cannot be parsed become 0.
pub fn normalize_date(date: Option<&str>) -> i64 {
    match date.map(str::trim) {
        None | Some("") => 0,
        Some(raw) => parse_date_seconds(raw).unwrap_or(0),
    }
}

/// Parse a date string into epoch seconds, flooring the millisecond value.
///
/// Accepts RFC 3339 timestamps, offset-less timestamps (read as UTC) and
/// plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date_seconds(raw: &str) -> Option<i64> {
    let raw = raw.trim();

    let millis = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        dt.timestamp_millis()
    } else if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        naive.and_utc().timestamp_millis()
    } else {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
        date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis()
    };

    Some(millis.div_euclid(1000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn video() -> VideoRecord {
        VideoRecord {
            video_id: Some("v1".to_string()),
            title: Some("A".to_string()),
            url: Some("u".to_string()),
            thumbnail_url: Some("t".to_string()),
            date: None,
            view_count: None,
            channel_name: Some("C".to_string()),
            is_nde: Some("clear_nde".to_string()),
        }
    }

    #[test]
    fn test_view_count_defaults_to_zero() {
        assert_eq!(normalize_view_count(None), 0);
        assert_eq!(normalize_view_count(Some(0)), 0);
        assert_eq!(normalize_view_count(Some(150_000)), 150_000);
    }

    #[test]
    fn test_missing_date_is_zero() {
        assert_eq!(normalize_date(None), 0);
        assert_eq!(normalize_date(Some("")), 0);
        assert_eq!(normalize_date(Some("   ")), 0);
    }

    #[test]
    fn test_date_with_offset() {
        assert_eq!(
            normalize_date(Some("2023-01-15T00:00:00+00:00")),
            1_673_740_800
        );
        assert_eq!(normalize_date(Some("2023-01-15T02:00:00+02:00")), 1_673_740_800);
        assert_eq!(normalize_date(Some("2023-01-15T00:00:00Z")), 1_673_740_800);
    }

    #[test]
    fn test_date_floors_milliseconds() {
        assert_eq!(
            normalize_date(Some("2023-01-15T00:00:00.999Z")),
            1_673_740_800
        );
        // Before the epoch the floor goes down, not toward zero.
        assert_eq!(normalize_date(Some("1969-12-31T23:59:59.500Z")), -1);
    }

    #[test]
    fn test_date_without_offset_is_utc() {
        assert_eq!(normalize_date(Some("2023-01-15T00:00:00")), 1_673_740_800);
        assert_eq!(normalize_date(Some("2023-01-15 00:00:00.250")), 1_673_740_800);
        assert_eq!(normalize_date(Some("2023-01-15")), 1_673_740_800);
    }

    #[test]
    fn test_unparseable_date() {
        assert_eq!(parse_date_seconds("last tuesday"), None);
        assert_eq!(normalize_date(Some("last tuesday")), 0);
    }

    #[test]
    fn test_join_copies_fields() {
        let segment = TranscriptSegment::new("v1", "hello", 1.5);

        let doc = SearchDocument::join(&video(), segment);

        assert_eq!(doc.video_id, "v1");
        assert_eq!(doc.title.as_deref(), Some("A"));
        assert_eq!(doc.content.as_deref(), Some("hello"));
        assert_eq!(doc.channel_name.as_deref(), Some("C"));
        assert_eq!(doc.is_nde.as_deref(), Some("clear_nde"));
        assert_eq!(doc.view_count, 0);
        assert_eq!(doc.date, 0);
        assert_eq!(doc.start_time, Some(1.5));
    }

    #[test]
    fn test_serialized_field_names() {
        let doc = SearchDocument::join(&video(), TranscriptSegment::new("v1", "hello", 1.5));

        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(
            value,
            json!({
                "title": "A",
                "content": "hello",
                "videoId": "v1",
                "channelName": "C",
                "isNde": "clear_nde",
                "viewCount": 0,
                "date": 0,
                "thumbnailUrl": "t",
                "url": "u",
                "start_time": 1.5
            })
        );
    }
}
