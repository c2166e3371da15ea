//! Source references and their canonical identities.
//!
//! A [`Source`] is what a recipe or directive wrote down: a path or a URL.
//! An [`Identity`] is what it denotes: a symlink-free absolute path for local
//! files, the exact URL string for remote ones. Identity is the dedup key for
//! the whole run.

mod canonical;
pub mod github;
mod segments;


pub use canonical::{Canonicalizer, SearchPaths};
pub use github::{GithubRef, GithubUrlKind};
pub use segments::path_segments;

use std::fmt;
use std::path::PathBuf;

/// Where a source's content lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Local,
    Remote,
}

/// A single reference to a rule document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    pub reference: String,
    pub kind: SourceKind,
}

impl Source {
    pub fn local(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            kind: SourceKind::Local,
        }
    }

    pub fn remote(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            kind: SourceKind::Remote,
        }
    }

    /// Classify a bare reference string by shape.
    pub fn from_reference(reference: &str) -> Self {
        if is_url(reference) {
            Self::remote(reference)
        } else {
            Self::local(reference)
        }
    }

    /// The source for an already-canonical identity.
    pub fn from_identity(identity: &Identity) -> Self {
        match identity {
            Identity::Local(path) => Self::local(path.display().to_string()),
            Identity::Remote(url) => Self::remote(url.clone()),
        }
    }
}

/// Canonical dedup key for a source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identity {
    Local(PathBuf),
    Remote(String),
}

impl Identity {
    pub fn kind(&self) -> SourceKind {
        match self {
            Identity::Local(_) => SourceKind::Local,
            Identity::Remote(_) => SourceKind::Remote,
        }
    }

    pub fn as_local(&self) -> Option<&PathBuf> {
        match self {
            Identity::Local(path) => Some(path),
            Identity::Remote(_) => None,
        }
    }

    /// Final path segment (file name) of the identity.
    pub fn file_name(&self) -> Option<String> {
        match self {
            Identity::Local(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned()),
            Identity::Remote(url) => url
                .split(['?', '#'])
                .next()
                .and_then(|u| u.rsplit('/').next())
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Local(path) => write!(f, "{}", path.display()),
            Identity::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Whether a reference string is a URL rather than a path.
pub fn is_url(reference: &str) -> bool {
    let Some((scheme, rest)) = reference.split_once("://") else {
        return false;
    };
    !scheme.is_empty()
        && !rest.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
