//! # NDE Indexer Repository
//!
//! This crate provides traits and implementations for the two external
//! services the indexer talks to: the relational store the rows are read
//! from (Supabase) and the search engine the documents are written to
//! (Typesense). It includes definitions for errors, interfaces, and the
//! concrete HTTP clients.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod supabase;
pub mod types;
pub mod typesense;

pub use config::{SupabaseConfig, TypesenseConfig};
pub use errors::{SearchIndexError, SourceError};
pub use interfaces::{RowSource, SearchIndexProvider};
pub use supabase::SupabaseClient;
pub use types::{ImportAction, ImportResult, ImportSummary};
pub use typesense::{CollectionSchema, TypesenseClient};
