//! Recipe loader.
//!
//! Expands a recipe into a flat, ordered list of [`Source`]s:
//!
//! 1. `files:` entries (directories expand recursively, globs match
//!    against each search root)
//! 2. `sources:` entries (local, remote, or GitHub `rules:` lists)
//! 3. legacy `remote_sources:` URLs
//! 4. files anywhere under the rule roots that name this recipe in their
//!    `recipes:` directive and are not already present
//!
//! Every expansion is sorted. Missing entries and failed directory listings
//! become warnings; loading never fails.

mod expand;

#[cfg(test)]
mod tests;

pub use expand::{all_markdown, expand_dir};

use crate::config::{GithubSource, Recipe, SourceSpec};
use crate::remote::RemoteFetcher;
use crate::source::{Canonicalizer, GithubRef, Identity, Source, SourceKind, is_url};
use crate::warning::Warning;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The sources a recipe expands to.
#[derive(Debug, Clone, Default)]
pub struct LoadedRecipe {
    pub sources: Vec<Source>,
    pub warnings: Vec<Warning>,
}

/// Expands recipes into sources.
pub struct Loader<'a> {
    canonicalizer: &'a Canonicalizer,
    fetcher: &'a dyn RemoteFetcher,
    rule_roots: &'a [PathBuf],
}

impl<'a> Loader<'a> {
    pub fn new(
        canonicalizer: &'a Canonicalizer,
        fetcher: &'a dyn RemoteFetcher,
        rule_roots: &'a [PathBuf],
    ) -> Self {
        Self {
            canonicalizer,
            fetcher,
            rule_roots,
        }
    }

    /// Expand `recipe` (registered as `name`) into its sources.
    pub fn load(&self, name: &str, recipe: &Recipe) -> LoadedRecipe {
        let mut out = LoadedRecipe::default();

        for entry in &recipe.files {
            self.add_local(name, entry, true, &mut out);
        }

        for spec in &recipe.sources {
            match spec {
                SourceSpec::File(path) => self.add_local(name, path, false, &mut out),
                SourceSpec::Local(path) => self.add_local(name, path, true, &mut out),
                SourceSpec::Remote(url) => out.sources.push(Source::remote(url.clone())),
                SourceSpec::Github(github) => self.add_github(github, &mut out),
            }
        }

        for url in &recipe.remote_sources {
            out.sources.push(Source::remote(url.clone()));
        }

        let present: HashSet<Identity> = out.sources.iter().map(identity_of).collect();
        for path in expand::tagged_files(self.rule_roots, name) {
            let identity = Identity::Local(path);
            if !present.contains(&identity) {
                out.sources.push(Source::from_identity(&identity));
            }
        }

        tracing::debug!(
            recipe = name,
            sources = out.sources.len(),
            warnings = out.warnings.len(),
            "loaded recipe"
        );
        out
    }

    fn add_local(&self, recipe: &str, entry: &str, allow_dir: bool, out: &mut LoadedRecipe) {
        if is_url(entry) {
            out.sources.push(Source::remote(entry));
            return;
        }

        if allow_dir && expand::is_glob(entry) {
            self.add_glob(recipe, entry, out);
            return;
        }

        match self.canonicalizer.resolve_top_level(entry) {
            Some(path) if path.is_dir() && allow_dir => {
                out.sources
                    .extend(expand_dir(&path).iter().map(|p| local_source(p)));
            }
            Some(path) if path.is_file() => out.sources.push(local_source(&path)),
            _ => out.warnings.push(Warning::MissingFile {
                recipe: recipe.to_string(),
                reference: entry.to_string(),
            }),
        }
    }

    fn add_glob(&self, recipe: &str, pattern: &str, out: &mut LoadedRecipe) {
        let mut matched: Vec<PathBuf> = Vec::new();
        for root in self.canonicalizer.search_paths().roots() {
            match expand::expand_glob(root, pattern) {
                Ok(files) => matched.extend(files),
                Err(reason) => {
                    out.warnings.push(Warning::InvalidPattern {
                        recipe: recipe.to_string(),
                        pattern: pattern.to_string(),
                        reason,
                    });
                    return;
                }
            }
        }
        matched.sort();
        matched.dedup();

        if matched.is_empty() {
            out.warnings.push(Warning::MissingFile {
                recipe: recipe.to_string(),
                reference: pattern.to_string(),
            });
        }
        out.sources.extend(matched.iter().map(|p| local_source(p)));
    }

    fn add_github(&self, github: &GithubSource, out: &mut LoadedRecipe) {
        for rule in &github.rules {
            let location = GithubRef::new(github.github.clone(), github.branch.clone(), rule);
            if location.has_extension() {
                out.sources.push(Source::remote(location.blob_url()));
                continue;
            }

            let tree_url = location.tree_url();
            match self.fetcher.list_directory(&tree_url) {
                Ok(mut blobs) => {
                    blobs.retain(|url| url.ends_with(".md"));
                    blobs.sort();
                    out.sources.extend(blobs.into_iter().map(Source::remote));
                }
                Err(err) => out.warnings.push(Warning::ListingFailed {
                    url: tree_url,
                    reason: err.to_string(),
                }),
            }
        }
    }
}

fn local_source(path: &Path) -> Source {
    Source::local(path.display().to_string())
}

fn identity_of(source: &Source) -> Identity {
    match source.kind {
        SourceKind::Local => Identity::Local(PathBuf::from(&source.reference)),
        SourceKind::Remote => Identity::Remote(source.reference.clone()),
    }
}
