//! Typesense implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using Typesense as the backend.

mod client;
mod queries;
mod schema;

pub use client::TypesenseClient;
pub use queries::{build_search_params, MAX_PER_PAGE};
pub use schema::{
    video_collection_schema, CollectionSchema, Field, COLLECTION_NAME, DEFAULT_SORTING_FIELD,
    FACET_FIELDS, QUERY_BY_FIELDS,
};
