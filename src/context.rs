//! Project context resolution.
//!
//! Finds the project root (the nearest ancestor of the working directory
//! holding a `squash.yaml`), the user home override directory, and from
//! those the merged config and the search paths every top-level reference
//! resolves against.

use crate::config::{CONFIG_FILE, Config};
use crate::error::{Result, SquashError};
use crate::source::{Canonicalizer, SearchPaths};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the user home override directory.
pub const HOME_ENV: &str = "SQUASH_HOME";

/// Resolved paths for one invocation. All paths are absolute.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub cwd: PathBuf,
    /// Directory of the base `squash.yaml`, or the cwd when there is none.
    pub project_root: PathBuf,
    /// The base config file, if one was found.
    pub base_config: Option<PathBuf>,
    /// User home override directory.
    pub user_home: Option<PathBuf>,
}

impl ProjectContext {
    /// Resolve the context from the current working directory and the
    /// environment.
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            SquashError::UserError(format!("failed to get current working directory: {}", e))
        })?;
        Ok(Self::resolve_with(&cwd, default_user_home()))
    }

    /// Resolve the context from a known directory and user home.
    pub fn resolve_with<P: AsRef<Path>>(cwd: P, user_home: Option<PathBuf>) -> Self {
        let cwd = dunce::canonicalize(cwd.as_ref()).unwrap_or_else(|_| cwd.as_ref().to_path_buf());
        let base_config = find_config(&cwd);
        let project_root = base_config
            .as_ref()
            .and_then(|p| p.parent())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.clone());

        tracing::debug!(
            cwd = %cwd.display(),
            project_root = %project_root.display(),
            has_config = base_config.is_some(),
            "resolved project context"
        );
        Self {
            cwd,
            project_root,
            base_config,
            user_home,
        }
    }

    /// `squash.yaml` in the user home override directory, if it exists.
    pub fn user_config(&self) -> Option<PathBuf> {
        self.user_home
            .as_ref()
            .map(|home| home.join(CONFIG_FILE))
            .filter(|p| p.is_file())
    }

    /// Load the base config merged with the user override config.
    pub fn load_config(&self) -> Result<Config> {
        let user = self.user_config();
        Config::load(self.base_config.as_deref(), user.as_deref())
    }

    /// `[cwd, user home, project root]`, missing and duplicate entries dropped.
    pub fn search_paths(&self) -> SearchPaths {
        let mut roots = vec![self.cwd.clone()];
        roots.extend(self.user_home.clone());
        roots.push(self.project_root.clone());
        SearchPaths::new(roots)
    }

    /// `[user home, project root]`. The cwd always sits inside the project
    /// root, so leaving it out keeps classification independent of it.
    pub fn segment_roots(&self) -> SearchPaths {
        let mut roots: Vec<PathBuf> = self.user_home.iter().cloned().collect();
        roots.push(self.project_root.clone());
        SearchPaths::new(roots)
    }

    /// Search paths for lookup, segment roots for classification.
    pub fn canonicalizer(&self) -> Canonicalizer {
        Canonicalizer::with_segment_roots(self.search_paths(), self.segment_roots())
    }

    /// `<root>/<rules_dir>` for every search root where it exists.
    pub fn rule_roots(&self, rules_dir: &str) -> Vec<PathBuf> {
        let mut out: Vec<PathBuf> = Vec::new();
        for root in self.search_paths().roots() {
            let candidate = root.join(rules_dir);
            if candidate.is_dir() && !out.contains(&candidate) {
                out.push(candidate);
            }
        }
        out
    }
}

/// `$SQUASH_HOME`, else the platform config directory for squash.
pub fn default_user_home() -> Option<PathBuf> {
    if let Some(home) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(home));
    }
    directories::ProjectDirs::from("", "", "squash").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Walk up from `start` looking for `squash.yaml`.
fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}
