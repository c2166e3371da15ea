//! Config struct definition and default implementation.

use super::types::*;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Configuration for squash.
///
/// This struct represents the merged contents of the project's `squash.yaml`
/// and the user's override `squash.yaml`. Unknown fields in the YAML are
/// ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory (relative to each search root) holding rule documents.
    /// Tag matching and diagnostics walk it.
    #[serde(default = "default_rules_dir")]
    pub rules_dir: String,

    /// Output naming settings.
    pub output: OutputConfig,

    /// MCP server definitions keyed by name.
    pub mcp_servers: BTreeMap<String, ServerDefinition>,

    /// Recipe registry keyed by name.
    pub recipes: BTreeMap<String, Recipe>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_dir: default_rules_dir(),
            output: OutputConfig::default(),
            mcp_servers: BTreeMap::new(),
            recipes: BTreeMap::new(),
        }
    }
}
