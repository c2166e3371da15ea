//! Configuration model for squash.
//!
//! This module defines the Config struct that represents the layered
//! `squash.yaml` files (project base plus user override). It supports
//! forward-compatible YAML parsing (unknown fields are ignored), sensible
//! defaults for optional fields, and validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use operations::{CONFIG_FILE, merge_layers};
pub use types::{
    GithubSource, OutputConfig, Recipe, ServerDefinition, SourceSpec, SubagentEntry,
};
