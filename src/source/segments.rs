//! Path segments used for classification and the `skills` rule.

use super::{GithubRef, Identity};
use std::path::{Component, PathBuf};

/// The path segments of an identity, relative to the deepest of `roots`
/// that contains it.
///
/// Local files outside every root use their full path. Remote identities use
/// the repository path of a GitHub URL, or the URL path otherwise.
pub fn path_segments(identity: &Identity, roots: &[PathBuf]) -> Vec<String> {
    match identity {
        Identity::Local(path) => {
            let relative = roots
                .iter()
                .filter(|root| path.starts_with(root))
                .max_by_key(|root| root.components().count())
                .and_then(|root| path.strip_prefix(root).ok())
                .unwrap_or(path);
            relative
                .components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        }
        Identity::Remote(url) => {
            let path = match GithubRef::parse(url) {
                Some((r, _)) => r.path,
                None => url::Url::parse(url)
                    .map(|u| u.path().to_string())
                    .unwrap_or_default(),
            };
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        }
    }
}
