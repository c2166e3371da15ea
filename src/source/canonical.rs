//! Reference canonicalization.
//!
//! `canonicalize(declaring, reference)` maps a reference written in some
//! context to the [`Identity`] it denotes, or `None` when nothing exists
//! there. Not-found is a signal, not an error; callers pick the policy.

use super::{GithubRef, Identity, is_url};
use std::path::{Path, PathBuf};

/// Ordered list of directories that top-level references resolve against.
///
/// Conventionally `[cwd, user home override, project root]`. Roots that do
/// not exist are dropped; the rest are stored canonicalized and deduplicated
/// in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    roots: Vec<PathBuf>,
}

impl SearchPaths {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut out: Vec<PathBuf> = Vec::new();
        for root in roots {
            let Ok(canonical) = dunce::canonicalize(root.as_ref()) else {
                continue;
            };
            if canonical.is_dir() && !out.contains(&canonical) {
                out.push(canonical);
            }
        }
        Self { roots: out }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

/// Resolves references to identities.
#[derive(Debug, Clone, Default)]
pub struct Canonicalizer {
    search: SearchPaths,
    segment_roots: SearchPaths,
}

impl Canonicalizer {
    /// Segments are taken relative to the search paths themselves.
    pub fn new(search: SearchPaths) -> Self {
        Self {
            segment_roots: search.clone(),
            search,
        }
    }

    /// Segments are taken relative to `segment_roots` instead of the search
    /// paths, so classification does not depend on where squash runs from.
    pub fn with_segment_roots(search: SearchPaths, segment_roots: SearchPaths) -> Self {
        Self {
            search,
            segment_roots,
        }
    }

    pub fn search_paths(&self) -> &SearchPaths {
        &self.search
    }

    /// Roots that [`path_segments`](super::path_segments) strips.
    pub fn segment_roots(&self) -> &SearchPaths {
        &self.segment_roots
    }

    /// Resolve `reference` as written inside `declaring`.
    ///
    /// With no declaring source the reference is a top-level recipe entry
    /// and is looked up along the search paths. Absolute URLs and absolute
    /// local paths bypass relative resolution.
    pub fn canonicalize(&self, declaring: Option<&Identity>, reference: &str) -> Option<Identity> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        if is_url(reference) {
            if GithubRef::escapes_repository(reference) {
                tracing::debug!(url = reference, "url path leaves the repository");
                return None;
            }
            return Some(Identity::Remote(reference.to_string()));
        }

        match declaring {
            None => self.resolve_top_level(reference).map(Identity::Local),
            Some(Identity::Local(file)) => {
                let candidate = if Path::new(reference).is_absolute() {
                    PathBuf::from(reference)
                } else {
                    file.parent().unwrap_or(Path::new("/")).join(reference)
                };
                resolve_local(&candidate).map(Identity::Local)
            }
            Some(Identity::Remote(url)) => resolve_remote(url, reference).map(Identity::Remote),
        }
    }

    /// Find a top-level local reference (file or directory) on the search paths.
    pub fn resolve_top_level(&self, reference: &str) -> Option<PathBuf> {
        let path = Path::new(reference);
        if path.is_absolute() {
            return resolve_local(path);
        }
        self.search
            .roots
            .iter()
            .find_map(|root| resolve_local(&root.join(path)))
    }
}

/// Resolve a local candidate to its canonical path.
///
/// An extension-less path prefers a `.md` sibling when one exists.
pub fn resolve_local(candidate: &Path) -> Option<PathBuf> {
    if candidate.extension().is_none() {
        let mut with_md = candidate.as_os_str().to_owned();
        with_md.push(".md");
        let with_md = PathBuf::from(with_md);
        if with_md.is_file() {
            return dunce::canonicalize(with_md).ok();
        }
    }
    if candidate.exists() {
        dunce::canonicalize(candidate).ok()
    } else {
        None
    }
}

/// Resolve a reference inside a remote document.
fn resolve_remote(declaring_url: &str, reference: &str) -> Option<String> {
    if let Some(blob) = GithubRef::parse_blob(declaring_url) {
        return blob.join(reference).map(|r| r.blob_url());
    }
    let base = url::Url::parse(declaring_url).ok()?;
    base.join(reference).ok().map(|u| u.to_string())
}
