//! Artifact emission.
//!
//! Emission is split in two so nothing touches the destination until the
//! whole tree has been validated and rendered:
//!
//! 1. [`plan`] turns a validated [`RecipeTree`](crate::subagent::RecipeTree)
//!    into an [`ArtifactPlan`], every output file with its bytes (pure)
//! 2. [`write`] writes the plan atomically, file by file
//!
//! Layout under the destination:
//!
//! ```text
//! CLAUDE.md                    combined content
//! commands/<recipe>/<path>     slash commands
//! skills/<name>/<path>         skills
//! bin/<path>                   scripts (executable)
//! agents/<subagent>.md         subagent definitions
//! .mcp.json                    MCP server manifest
//! ```

mod plan;


pub use plan::plan;

use crate::error::{Result, SquashError};
use crate::fs::{atomic_write, atomic_write_executable};
use crate::warning::Warning;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Emission options that can differ per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanOptions {
    /// File name of the combined document.
    pub combined: String,
    /// Keep non-directive frontmatter fields.
    pub preserve_frontmatter: bool,
    /// Only `essential: true` files join combined content.
    pub essential_only: bool,
}

/// One output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the destination directory.
    pub path: PathBuf,
    pub contents: String,
    pub executable: bool,
}

/// Every file a build produces, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct ArtifactPlan {
    artifacts: BTreeMap<PathBuf, Artifact>,
    pub warnings: Vec<Warning>,
}

impl ArtifactPlan {
    /// Add an artifact. A path already planned keeps its first contents.
    ///
    /// Paths that are empty, absolute, or contain `.`/`..` are refused with
    /// a warning.
    pub(crate) fn add(&mut self, path: impl Into<PathBuf>, contents: String, executable: bool) -> bool {
        let path = path.into();
        if !is_contained(&path) {
            self.warnings.push(Warning::UnsafeArtifactPath {
                path: path.display().to_string(),
            });
            return false;
        }
        if self.artifacts.contains_key(&path) {
            tracing::debug!(path = %path.display(), "artifact already planned, keeping first");
            return false;
        }
        self.artifacts.insert(
            path.clone(),
            Artifact {
                path,
                contents,
                executable,
            },
        );
        true
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Artifact> {
        self.artifacts.get(path.as_ref())
    }

    pub fn paths(&self) -> Vec<&Path> {
        self.artifacts.keys().map(PathBuf::as_path).collect()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

/// Whether `path` is a non-empty relative path made of plain names only.
fn is_contained(path: &Path) -> bool {
    path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_)))
}

/// Write every artifact in `plan` under `dest`. Returns the number written.
pub fn write(plan: &ArtifactPlan, dest: &Path) -> Result<usize> {
    for artifact in plan.artifacts() {
        if !is_contained(&artifact.path) {
            return Err(SquashError::WriteError(format!(
                "refusing to write '{}' outside '{}'",
                artifact.path.display(),
                dest.display()
            )));
        }
        let target = dest.join(&artifact.path);
        if artifact.executable {
            atomic_write_executable(&target, artifact.contents.as_bytes())?;
        } else {
            atomic_write(&target, artifact.contents.as_bytes())?;
        }
        tracing::debug!(path = %target.display(), "wrote artifact");
    }
    tracing::info!(
        artifacts = plan.len(),
        dest = %dest.display(),
        "wrote artifacts"
    );
    Ok(plan.len())
}
