use crate::remote::{FetchError, RemoteFetcher};
use crate::source::{Canonicalizer, SearchPaths};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway directory of rule files.
pub(crate) struct RuleTree {
    dir: TempDir,
}

impl RuleTree {
    pub(crate) fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Canonical root of the tree.
    pub(crate) fn root(&self) -> PathBuf {
        dunce::canonicalize(self.dir.path()).unwrap()
    }

    /// Write `content` to `rel`, creating parent directories. Returns the
    /// canonical path.
    pub(crate) fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        dunce::canonicalize(path).unwrap()
    }

    /// Canonical path of `rel` (which must exist).
    pub(crate) fn path(&self, rel: &str) -> PathBuf {
        dunce::canonicalize(self.dir.path().join(rel)).unwrap()
    }

    pub(crate) fn search_paths(&self) -> SearchPaths {
        SearchPaths::new([self.dir.path()])
    }

    pub(crate) fn canonicalizer(&self) -> Canonicalizer {
        Canonicalizer::new(self.search_paths())
    }

    /// `<root>/rules`, the default rule root.
    pub(crate) fn rule_roots(&self) -> Vec<PathBuf> {
        vec![self.root().join("rules")]
    }
}

/// In-memory fetcher that records every call.
#[derive(Default)]
pub(crate) struct MemoryFetcher {
    pub(crate) files: BTreeMap<String, String>,
    pub(crate) listings: BTreeMap<String, Vec<String>>,
    pub(crate) batch: bool,
    pub(crate) calls: RefCell<Vec<String>>,
}

impl MemoryFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_file(mut self, url: &str, content: &str) -> Self {
        self.files.insert(url.to_string(), content.to_string());
        self
    }

    pub(crate) fn with_listing(mut self, tree_url: &str, blobs: &[&str]) -> Self {
        self.listings.insert(
            tree_url.to_string(),
            blobs.iter().map(|b| b.to_string()).collect(),
        );
        self
    }

    pub(crate) fn with_batch(mut self) -> Self {
        self.batch = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl RemoteFetcher for MemoryFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.borrow_mut().push(format!("fetch {}", url));
        self.files
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Failed("404 Not Found".to_string()))
    }

    fn fetch_batch(&self, urls: &[String]) -> Result<BTreeMap<String, String>, FetchError> {
        self.calls
            .borrow_mut()
            .push(format!("batch {}", urls.len()));
        if !self.batch {
            return Err(FetchError::Unsupported);
        }
        Ok(urls
            .iter()
            .filter_map(|u| self.files.get(u).map(|c| (u.clone(), c.clone())))
            .collect())
    }

    fn list_directory(&self, tree_url: &str) -> Result<Vec<String>, FetchError> {
        self.calls.borrow_mut().push(format!("list {}", tree_url));
        self.listings
            .get(tree_url)
            .cloned()
            .ok_or_else(|| FetchError::Failed("listing unavailable".to_string()))
    }
}

/// Assert that `path` exists and holds exactly `expected`.
pub(crate) fn assert_file(path: &Path, expected: &str) {
    let actual = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("expected {} to exist: {}", path.display(), e));
    assert_eq!(actual, expected, "contents of {}", path.display());
}
