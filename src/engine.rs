//! Engine facade.
//!
//! Bundles the collaborators one run needs (recipe registry, canonicalizer,
//! content reader, rule roots) and caches each recipe's resolution for the
//! lifetime of the value, so a recipe reached both as an owner and as a
//! subagent is only resolved once.

use crate::config::Recipe;
use crate::diagnostics::{self, Report, RuleGraph};
use crate::error::{Result, SquashError};
use crate::loader::{LoadedRecipe, Loader, all_markdown};
use crate::mcp;
use crate::registry::RecipeRegistry;
use crate::remote::{ContentReader, RemoteFetcher};
use crate::resolver::{Resolution, Resolver};
use crate::source::{Canonicalizer, Identity};
use crate::subagent::{self, RecipeTree};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

pub struct Engine<'a> {
    registry: &'a dyn RecipeRegistry,
    canonicalizer: Canonicalizer,
    rule_roots: Vec<PathBuf>,
    reader: ContentReader<'a>,
    cache: HashMap<String, Resolution>,
}

impl<'a> Engine<'a> {
    pub fn new(
        registry: &'a dyn RecipeRegistry,
        fetcher: &'a dyn RemoteFetcher,
        canonicalizer: Canonicalizer,
        rule_roots: Vec<PathBuf>,
    ) -> Self {
        Self {
            registry,
            canonicalizer,
            rule_roots,
            reader: ContentReader::new(fetcher),
            cache: HashMap::new(),
        }
    }

    pub fn recipe(&self, name: &str) -> Result<&'a Recipe> {
        let registry = self.registry;
        registry
            .recipe(name)
            .ok_or_else(|| SquashError::UserError(format!("unknown recipe '{}'", name)))
    }

    /// Expand a recipe into its sources.
    pub fn load_recipe(&self, name: &str) -> Result<LoadedRecipe> {
        let recipe = self.recipe(name)?;
        let loader = Loader::new(&self.canonicalizer, self.reader.fetcher(), &self.rule_roots);
        Ok(loader.load(name, recipe))
    }

    /// Load and resolve a recipe. Loader warnings come first.
    pub fn resolve_recipe(&mut self, name: &str) -> Result<Resolution> {
        if let Some(cached) = self.cache.get(name) {
            return Ok(cached.clone());
        }

        let loaded = self.load_recipe(name)?;
        let mut resolution =
            Resolver::new(&self.canonicalizer, &mut self.reader).resolve(&loaded.sources)?;
        let mut warnings = loaded.warnings;
        warnings.append(&mut resolution.warnings);
        resolution.warnings = warnings;

        tracing::debug!(
            recipe = name,
            files = resolution.processed.len(),
            "resolved recipe"
        );
        self.cache.insert(name.to_string(), resolution.clone());
        Ok(resolution)
    }

    /// Build and validate the recipe tree rooted at `name`.
    pub fn build(&mut self, name: &str) -> Result<RecipeTree> {
        let registry = self.registry;
        subagent::build_tree(registry, name, &mut |n: &str| self.resolve_recipe(n))
    }

    /// Every MCP server name `name` needs.
    pub fn mcp_servers(&mut self, name: &str) -> Result<BTreeSet<String>> {
        let registry = self.registry;
        mcp::collect_servers(registry, name, &mut |n: &str| self.resolve_recipe(n))
    }

    /// Health report over the rule tree.
    ///
    /// With `only` set, the report covers the files that recipe reaches and
    /// skips orphan detection.
    pub fn diagnose(&self, only: Option<&str>) -> Result<Report> {
        let names = match only {
            Some(name) => {
                self.recipe(name)?;
                vec![name.to_string()]
            }
            None => self.registry.names(),
        };

        let mut entries: Vec<Identity> = Vec::new();
        for name in &names {
            for source in self.load_recipe(name)?.sources {
                if let Some(identity) = self.canonicalizer.canonicalize(None, &source.reference) {
                    entries.push(identity);
                }
            }
        }

        let universe = if only.is_some() {
            Vec::new()
        } else {
            all_markdown(&self.rule_roots)
        };
        let graph = RuleGraph::build(&self.canonicalizer, universe, &entries);
        Ok(diagnostics::report(&graph, only.is_none()))
    }
}
