//! Config loading, layering, and validation.

use super::model::Config;
use crate::error::{Result, SquashError};
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::path::Path;

/// Config file name, both in the project root and the user override directory.
pub const CONFIG_FILE: &str = "squash.yaml";

/// Top-level keys whose maps merge entry-by-entry instead of being replaced.
const KEYED_SECTIONS: [&str; 2] = ["recipes", "mcp_servers"];

impl Config {
    /// Load and merge the base config and the user override config.
    ///
    /// Either file may be absent. The user file wins key-for-key: recipe and
    /// server entries replace base entries with the same name, other
    /// top-level keys replace the base value outright.
    pub fn load(base: Option<&Path>, user: Option<&Path>) -> Result<Self> {
        let base = base.map(read_yaml_value).transpose()?;
        let user = user.map(read_yaml_value).transpose()?;
        let merged = merge_layers(base.unwrap_or(Value::Null), user.unwrap_or(Value::Null));
        Self::from_value(merged)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value = parse_yaml_value(yaml, "config")?;
        Self::from_value(value)
    }

    /// Parse a base and user layer given as YAML strings.
    pub fn from_layers(base: &str, user: &str) -> Result<Self> {
        let base = parse_yaml_value(base, "base config")?;
        let user = parse_yaml_value(user, "user config")?;
        Self::from_value(merge_layers(base, user))
    }

    fn from_value(value: Value) -> Result<Self> {
        let config: Config = if value.is_null() {
            Config::default()
        } else {
            serde_yaml::from_value(value)
                .map_err(|e| SquashError::ConfigError(format!("failed to parse config: {}", e)))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    ///
    /// Rules:
    /// - recipe names are non-empty
    /// - every subagent has a non-empty `name` and `recipe`
    /// - subagent names are unique within a recipe
    /// - `output.combined` is a plain, non-empty file name
    /// - server definitions with a single-string `command` split cleanly
    pub fn validate(&self) -> Result<()> {
        let combined = &self.output.combined;
        if combined.trim().is_empty() || combined.contains(['/', '\\']) {
            return Err(SquashError::ConfigError(format!(
                "output.combined must be a plain file name (found '{}')",
                combined
            )));
        }

        for (name, recipe) in &self.recipes {
            if name.trim().is_empty() {
                return Err(SquashError::ConfigError(
                    "recipe names must be non-empty".to_string(),
                ));
            }
            let mut seen = HashSet::new();
            for entry in &recipe.subagents {
                if entry.name.trim().is_empty() || entry.recipe.trim().is_empty() {
                    return Err(SquashError::ConfigError(format!(
                        "recipe '{}': every subagent needs a non-empty 'name' and 'recipe'",
                        name
                    )));
                }
                if !seen.insert(entry.name.as_str()) {
                    return Err(SquashError::ConfigError(format!(
                        "recipe '{}': subagent '{}' is declared more than once",
                        name, entry.name
                    )));
                }
            }
        }

        for (name, server) in &self.mcp_servers {
            server
                .normalized()
                .map_err(|e| SquashError::ConfigError(format!("mcp server '{}': {}", name, e)))?;
        }

        Ok(())
    }
}

/// Merge two config layers, user over base.
pub fn merge_layers(base: Value, user: Value) -> Value {
    let (mut base, user) = match (base, user) {
        (Value::Mapping(b), Value::Mapping(u)) => (b, u),
        (base, Value::Null) => return base,
        (_, user) => return user,
    };

    for (key, user_value) in user {
        let keyed = key.as_str().is_some_and(|k| KEYED_SECTIONS.contains(&k));
        let merged = match (keyed, base.remove(&key), user_value) {
            (true, Some(Value::Mapping(b)), Value::Mapping(u)) => {
                let mut section: Mapping = b;
                for (entry, value) in u {
                    section.insert(entry, value);
                }
                Value::Mapping(section)
            }
            (_, _, user_value) => user_value,
        };
        base.insert(key, merged);
    }
    Value::Mapping(base)
}

fn read_yaml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SquashError::ConfigError(format!(
            "failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    parse_yaml_value(&content, &path.display().to_string())
}

fn parse_yaml_value(yaml: &str, what: &str) -> Result<Value> {
    if yaml.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(yaml)
        .map_err(|e| SquashError::ConfigError(format!("failed to parse {}: {}", what, e)))
}
