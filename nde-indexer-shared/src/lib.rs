//! # NDE Indexer Shared
//!
//! Shared types for the NDE search indexer: the relational rows the
//! pipeline reads, the search documents it writes, and the query types
//! used against the search collection.

pub mod document;
pub mod records;
pub mod search;

pub use document::{normalize_date, normalize_view_count, SearchDocument};
pub use records::{TranscriptSegment, VideoRecord};
pub use search::{FacetCount, FacetCounts, SearchHit, SearchQuery, SearchResponse};
