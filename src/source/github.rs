//! GitHub blob and tree URL handling.
//!
//! Relative references inside a GitHub-hosted document resolve against the
//! repository path only. Branch and host never change, and `.`/`..` are
//! plain segment arithmetic with no filesystem access.

const GITHUB_HOST: &str = "https://github.com/";

/// Whether a GitHub URL points at a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GithubUrlKind {
    Blob,
    Tree,
}

/// A location inside a GitHub repository at a given branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubRef {
    /// `owner/repo`.
    pub repo: String,
    pub branch: String,
    /// Repository-relative path with no leading slash. Empty for the root.
    pub path: String,
}

impl GithubRef {
    pub fn new(repo: impl Into<String>, branch: impl Into<String>, path: &str) -> Self {
        Self {
            repo: repo.into(),
            branch: branch.into(),
            path: path.trim_matches('/').to_string(),
        }
    }

    /// Parse `https://github.com/<owner>/<repo>/(blob|tree)/<branch>[/<path>]`.
    ///
    /// `.` and `..` in the path are collapsed. A path that climbs above the
    /// repository root does not parse.
    pub fn parse(url: &str) -> Option<(Self, GithubUrlKind)> {
        let (repo, kind, branch, path) = split_url(url)?;
        let path = normalize_segments(path)?;
        Some((Self::new(repo, branch, &path), kind))
    }

    /// Whether `url` has the GitHub blob/tree shape but its path climbs
    /// above the repository root.
    pub fn escapes_repository(url: &str) -> bool {
        split_url(url).is_some_and(|(_, _, _, path)| normalize_segments(path).is_none())
    }

    /// Parse a blob URL only.
    pub fn parse_blob(url: &str) -> Option<Self> {
        match Self::parse(url)? {
            (r, GithubUrlKind::Blob) => Some(r),
            _ => None,
        }
    }

    pub fn blob_url(&self) -> String {
        format!(
            "{}{}/blob/{}/{}",
            GITHUB_HOST, self.repo, self.branch, self.path
        )
    }

    pub fn tree_url(&self) -> String {
        if self.path.is_empty() {
            format!("{}{}/tree/{}", GITHUB_HOST, self.repo, self.branch)
        } else {
            format!(
                "{}{}/tree/{}/{}",
                GITHUB_HOST, self.repo, self.branch, self.path
            )
        }
    }

    /// The directory part of this path.
    pub fn parent_dir(&self) -> &str {
        match self.path.rfind('/') {
            Some(idx) => &self.path[..idx],
            None => "",
        }
    }

    /// Resolve a reference written inside this document.
    ///
    /// A leading `/` means repository root. Returns `None` when `..` climbs
    /// above the root.
    pub fn join(&self, reference: &str) -> Option<Self> {
        let joined = match reference.strip_prefix('/') {
            Some(from_root) => from_root.to_string(),
            None => {
                let dir = self.parent_dir();
                if dir.is_empty() {
                    reference.to_string()
                } else {
                    format!("{}/{}", dir, reference)
                }
            }
        };
        let path = normalize_segments(&joined)?;
        Some(Self {
            repo: self.repo.clone(),
            branch: self.branch.clone(),
            path,
        })
    }

    /// Whether the last path segment carries an extension.
    pub fn has_extension(&self) -> bool {
        has_extension(&self.path)
    }
}

/// Collapse `.` and `..` segments. `None` if the path escapes its root.
pub fn normalize_segments(path: &str) -> Option<String> {
    let mut out: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop()?;
            }
            s => out.push(s),
        }
    }
    Some(out.join("/"))
}

fn split_url(url: &str) -> Option<(String, GithubUrlKind, &str, &str)> {
    let rest = url.strip_prefix(GITHUB_HOST)?;
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);
    let mut parts = rest.splitn(5, '/');
    let owner = parts.next().filter(|s| !s.is_empty())?;
    let repo = parts.next().filter(|s| !s.is_empty())?;
    let kind = match parts.next()? {
        "blob" => GithubUrlKind::Blob,
        "tree" => GithubUrlKind::Tree,
        _ => return None,
    };
    let branch = parts.next().filter(|s| !s.is_empty())?;
    let path = parts.next().unwrap_or("");
    Some((format!("{}/{}", owner, repo), kind, branch, path))
}

/// Whether the final segment of a slash-separated path has an extension.
pub fn has_extension(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or(path);
    match last.rfind('.') {
        Some(0) | None => false,
        Some(idx) => idx + 1 < last.len(),
    }
}
