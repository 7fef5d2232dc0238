//! Configuration and dependency wiring.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{ImportProfile, IndexerConfig, LogFormat, Overrides, SearchConfig};
