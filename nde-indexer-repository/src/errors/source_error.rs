//! Relational source error types.
//!
//! This module defines the errors that can occur while reading rows from the
//! relational store.

use thiserror::Error;

/// Errors that can occur while reading from the relational store.
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The store answered a page request with an error.
    #[error("Error fetching {table} (status {status}): {message}")]
    FetchError {
        table: String,
        status: u16,
        message: String,
    },

    /// A page or row could not be decoded.
    #[error("Decode error for {table}: {message}")]
    DecodeError { table: String, message: String },

    /// The source was configured with unusable settings.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SourceError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a fetch error for the given table.
    pub fn fetch(table: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::FetchError {
            table: table.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a decode error for the given table.
    pub fn decode(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DecodeError {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
