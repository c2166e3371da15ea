//! Subagent tree builder and dispatch validator.
//!
//! A recipe may register subagents, each backed by another recipe. The tree
//! is never more than one hop deep: a recipe used as a subagent may not
//! register subagents, and none of its files may dispatch. Every check runs
//! before anything is emitted, so a rejected tree produces no output at all.


use crate::config::{Recipe, SubagentEntry};
use crate::error::{Result, SquashError, ValidationError};
use crate::mcp::collect_servers;
use crate::registry::RecipeRegistry;
use crate::resolver::{ProcessedSource, Resolution};
use crate::warning::Warning;
use std::collections::BTreeSet;

/// A validated recipe with its resolved subagents.
#[derive(Debug, Clone)]
pub struct RecipeTree {
    pub name: String,
    pub recipe: Recipe,
    pub resolution: Resolution,
    /// Servers needed by the recipe and all its subagents.
    pub servers: BTreeSet<String>,
    pub subagents: Vec<SubagentUnit>,
}

impl RecipeTree {
    /// Resolution warnings of the root recipe, then of each subagent.
    pub fn warnings(&self) -> impl Iterator<Item = &Warning> {
        self.resolution
            .warnings
            .iter()
            .chain(self.subagents.iter().flat_map(|s| s.resolution.warnings.iter()))
    }
}

/// One subagent, resolved from its backing recipe.
#[derive(Debug, Clone)]
pub struct SubagentUnit {
    pub entry: SubagentEntry,
    pub recipe: Recipe,
    pub resolution: Resolution,
    pub servers: BTreeSet<String>,
}

impl SubagentUnit {
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Model override for the subagent: entry first, then the backing recipe.
    pub fn model(&self) -> Option<&str> {
        self.entry.model.as_deref().or(self.recipe.model.as_deref())
    }
}

/// Build and validate the tree rooted at recipe `name`.
///
/// `resolve` produces the resolution of a recipe by name.
pub fn build_tree<F>(registry: &dyn RecipeRegistry, name: &str, resolve: &mut F) -> Result<RecipeTree>
where
    F: FnMut(&str) -> Result<Resolution>,
{
    let recipe = registry
        .recipe(name)
        .ok_or_else(|| SquashError::UserError(format!("unknown recipe '{}'", name)))?;
    let resolution = resolve(name)?;

    check_dispatches(name, recipe, &resolution)?;

    let mut subagents = Vec::with_capacity(recipe.subagents.len());
    for entry in &recipe.subagents {
        let child = registry.recipe(&entry.recipe).ok_or_else(|| {
            ValidationError::UnknownSubagentRecipe {
                owner: name.to_string(),
                subagent: entry.name.clone(),
                recipe: entry.recipe.clone(),
            }
        })?;

        if !child.subagents.is_empty() {
            return Err(ValidationError::NestedSubagents {
                child: entry.recipe.clone(),
                nested: child.subagent_names(),
            }
            .into());
        }

        let child_resolution = resolve(&entry.recipe)?;
        check_purity(&entry.recipe, &child_resolution)?;

        let servers = collect_servers(registry, &entry.recipe, resolve)?;
        tracing::debug!(
            owner = name,
            subagent = entry.name.as_str(),
            recipe = entry.recipe.as_str(),
            files = child_resolution.processed.len(),
            "built subagent"
        );
        subagents.push(SubagentUnit {
            entry: entry.clone(),
            recipe: child.clone(),
            resolution: child_resolution,
            servers,
        });
    }

    let servers = collect_servers(registry, name, resolve)?;
    Ok(RecipeTree {
        name: name.to_string(),
        recipe: recipe.clone(),
        resolution,
        servers,
        subagents,
    })
}

/// Every `dispatches:` target in the owner's files must be a registered
/// subagent name.
fn check_dispatches(name: &str, recipe: &Recipe, resolution: &Resolution) -> Result<()> {
    for processed in &resolution.processed {
        for target in &processed.directives().dispatches {
            if recipe.subagent(target).is_none() {
                return Err(ValidationError::UnregisteredDispatch {
                    recipe: name.to_string(),
                    file: display_name(processed),
                    target: target.clone(),
                }
                .into());
            }
        }
    }
    Ok(())
}

/// No file of a subagent-backing recipe may dispatch.
fn check_purity(child: &str, resolution: &Resolution) -> Result<()> {
    let offenders: Vec<String> = resolution
        .processed
        .iter()
        .filter(|p| !p.directives().dispatches.is_empty())
        .map(display_name)
        .collect();
    if offenders.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::SubagentDispatches {
            recipe: child.to_string(),
            files: offenders,
        }
        .into())
    }
}

/// Root-relative path of a processed source, for messages.
pub fn display_name(processed: &ProcessedSource) -> String {
    if processed.segments.is_empty() {
        processed.identity.to_string()
    } else {
        processed.segments.join("/")
    }
}
