//! Supabase implementation of the relational row source.
//!
//! Rows are read through the PostgREST API that Supabase exposes for every
//! table.

mod client;

pub use client::SupabaseClient;
