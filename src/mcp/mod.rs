//! MCP server aggregation.
//!
//! A recipe needs the servers it declares itself, the servers any of its
//! resolved files declare through `mcp_servers:`, and everything its
//! subagents need in turn. Each recipe name is expanded at most once per
//! call, so circular subagent graphs still terminate.

#[cfg(test)]
mod tests;

use crate::config::ServerDefinition;
use crate::error::{Result, SquashError};
use crate::registry::RecipeRegistry;
use crate::resolver::Resolution;
use crate::warning::Warning;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Every server name `name` needs, deduplicated and sorted.
///
/// `resolve` produces the resolution of a recipe by name. Subagent entries
/// pointing at unregistered recipes are skipped here; the tree builder is
/// the one that rejects them.
pub fn collect_servers<F>(
    registry: &dyn RecipeRegistry,
    name: &str,
    resolve: &mut F,
) -> Result<BTreeSet<String>>
where
    F: FnMut(&str) -> Result<Resolution>,
{
    if registry.recipe(name).is_none() {
        return Err(SquashError::UserError(format!("unknown recipe '{}'", name)));
    }
    let mut visited = HashSet::from([name.to_string()]);
    let mut out = BTreeSet::new();
    collect_into(registry, name, resolve, &mut visited, &mut out)?;
    Ok(out)
}

fn collect_into<F>(
    registry: &dyn RecipeRegistry,
    name: &str,
    resolve: &mut F,
    visited: &mut HashSet<String>,
    out: &mut BTreeSet<String>,
) -> Result<()>
where
    F: FnMut(&str) -> Result<Resolution>,
{
    let Some(recipe) = registry.recipe(name) else {
        return Ok(());
    };

    out.extend(recipe.mcp_servers.iter().cloned());
    out.extend(resolve(name)?.declared_servers().cloned());

    for entry in &recipe.subagents {
        if visited.insert(entry.recipe.clone()) {
            collect_into(registry, &entry.recipe, resolve, visited, out)?;
        }
    }
    Ok(())
}

/// The `.mcp.json` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct McpConfig {
    #[serde(rename = "mcpServers")]
    pub mcp_servers: BTreeMap<String, ServerDefinition>,
}

impl McpConfig {
    /// Look up each name in `definitions`.
    ///
    /// Names with no definition are left out and reported as warnings.
    pub fn from_names(
        names: &BTreeSet<String>,
        definitions: &BTreeMap<String, ServerDefinition>,
    ) -> (Self, Vec<Warning>) {
        let mut config = Self::default();
        let mut warnings = Vec::new();
        for name in names {
            match definitions.get(name) {
                Some(def) => {
                    let def = def.normalized().unwrap_or_else(|_| def.clone());
                    config.mcp_servers.insert(name.clone(), def);
                }
                None => warnings.push(Warning::UndefinedServer { name: name.clone() }),
            }
        }
        (config, warnings)
    }

    pub fn is_empty(&self) -> bool {
        self.mcp_servers.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| SquashError::WriteError(format!("failed to serialize .mcp.json: {}", e)))
    }
}
