//! Processor module for the reindex pipeline.
//!
//! Joins transcript segments with video metadata into search documents.

mod segment_joiner;

pub use segment_joiner::{JoinOutput, JoinStats, SegmentJoiner};
