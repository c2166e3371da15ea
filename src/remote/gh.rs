//! Fetchers backed by external command-line tools.
//!
//! GitHub URLs go through `gh api` (so private repositories work with the
//! user's existing login); anything else goes through `curl`. Batch fetches
//! send one GraphQL query per repository and branch.

use super::{FetchError, RemoteFetcher};
use crate::source::{GithubRef, GithubUrlKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::process::Command;

/// Fetcher that shells out to `gh` and `curl`.
#[derive(Debug, Clone, Default)]
pub struct GhCliFetcher;

impl GhCliFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl RemoteFetcher for GhCliFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        match GithubRef::parse(url) {
            Some((blob, GithubUrlKind::Blob)) => {
                let endpoint = format!(
                    "repos/{}/contents/{}?ref={}",
                    blob.repo, blob.path, blob.branch
                );
                run_tool(
                    "gh",
                    &["api", "-H", "Accept: application/vnd.github.raw", &endpoint],
                )
            }
            Some((_, GithubUrlKind::Tree)) => Err(FetchError::UnsupportedUrl(url.to_string())),
            None => run_tool("curl", &["-fsSL", url]),
        }
    }

    /// Only GitHub blob URLs are batched. A query that fails leaves its
    /// URLs to the per-file fallback.
    fn fetch_batch(&self, urls: &[String]) -> Result<BTreeMap<String, String>, FetchError> {
        let groups = group_blobs(urls);
        if groups.is_empty() {
            return Err(FetchError::Unsupported);
        }

        let mut out = BTreeMap::new();
        for ((repo, branch), blobs) in &groups {
            let Some(query) = batch_query(repo, branch, blobs) else {
                continue;
            };
            match run_tool("gh", &["api", "graphql", "-f", &format!("query={}", query)]) {
                Ok(json) => out.extend(parse_batch(&json, blobs)),
                Err(err) => tracing::debug!(repo = %repo, error = %err, "batch query failed"),
            }
        }
        Ok(out)
    }

    fn list_directory(&self, tree_url: &str) -> Result<Vec<String>, FetchError> {
        let Some((tree, GithubUrlKind::Tree)) = GithubRef::parse(tree_url) else {
            return Err(FetchError::UnsupportedUrl(tree_url.to_string()));
        };
        let endpoint = format!(
            "repos/{}/git/trees/{}?recursive=1",
            tree.repo, tree.branch
        );
        let json = run_tool("gh", &["api", &endpoint])?;
        let listing: TreeListing = serde_json::from_str(&json)
            .map_err(|e| FetchError::Failed(format!("unexpected tree listing: {}", e)))?;
        Ok(blobs_under(&tree, &listing))
    }
}

/// Fetcher for `--offline` runs. Every remote operation fails.
#[derive(Debug, Clone, Default)]
pub struct OfflineFetcher;

impl RemoteFetcher for OfflineFetcher {
    fn fetch(&self, _url: &str) -> Result<String, FetchError> {
        Err(FetchError::Failed("offline mode".to_string()))
    }

    fn list_directory(&self, _tree_url: &str) -> Result<Vec<String>, FetchError> {
        Err(FetchError::Failed("offline mode".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct TreeListing {
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Blob URLs for every file under the tree's directory, sorted.
fn blobs_under(tree: &GithubRef, listing: &TreeListing) -> Vec<String> {
    let prefix = if tree.path.is_empty() {
        String::new()
    } else {
        format!("{}/", tree.path)
    };
    let mut urls: Vec<String> = listing
        .tree
        .iter()
        .filter(|e| e.kind == "blob" && e.path.starts_with(&prefix))
        .map(|e| GithubRef::new(tree.repo.clone(), tree.branch.clone(), &e.path).blob_url())
        .collect();
    urls.sort();
    urls
}

/// `(url, path)` pairs, one group per `(owner/repo, branch)`.
type BlobGroups = BTreeMap<(String, String), Vec<(String, String)>>;

fn group_blobs(urls: &[String]) -> BlobGroups {
    let mut groups = BlobGroups::new();
    for url in urls {
        if let Some(blob) = GithubRef::parse_blob(url) {
            groups
                .entry((blob.repo, blob.branch))
                .or_default()
                .push((url.clone(), blob.path));
        }
    }
    groups
}

/// One aliased `object(expression:)` lookup per blob, `f0`, `f1`, ...
fn batch_query(repo: &str, branch: &str, blobs: &[(String, String)]) -> Option<String> {
    let (owner, name) = repo.split_once('/')?;
    let mut query = format!(
        "query {{ repository(owner: {}, name: {}) {{",
        graphql_string(owner),
        graphql_string(name)
    );
    for (i, (_, path)) in blobs.iter().enumerate() {
        query.push_str(&format!(
            " f{}: object(expression: {}) {{ ... on Blob {{ text }} }}",
            i,
            graphql_string(&format!("{}:{}", branch, path))
        ));
    }
    query.push_str(" } }");
    Some(query)
}

fn graphql_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// Texts found in a batch response, keyed by URL. Missing and binary blobs
/// come back null and are left out.
fn parse_batch(json: &str, blobs: &[(String, String)]) -> Vec<(String, String)> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(json) else {
        return Vec::new();
    };
    let Some(repository) = value.get("data").and_then(|d| d.get("repository")) else {
        return Vec::new();
    };
    blobs
        .iter()
        .enumerate()
        .filter_map(|(i, (url, _))| {
            let text = repository
                .get(format!("f{}", i).as_str())
                .and_then(|object| object.get("text"))
                .and_then(serde_json::Value::as_str)?;
            Some((url.clone(), text.to_string()))
        })
        .collect()
}

fn run_tool(program: &str, args: &[&str]) -> Result<String, FetchError> {
    let output = Command::new(program).args(args).output().map_err(|e| {
        FetchError::Failed(format!("failed to execute {} (is it installed?): {}", program, e))
    })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(FetchError::Failed(format!(
            "{} failed (exit code {}): {}",
            program,
            output.status.code().unwrap_or(-1),
            stderr
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blobs_under_filters_to_directory() {
        let tree = GithubRef::new("acme/rules", "main", "rules/python");
        let listing: TreeListing = serde_json::from_str(
            r#"{"tree": [
                {"path": "rules/python", "type": "tree"},
                {"path": "rules/python/style.md", "type": "blob"},
                {"path": "rules/python/deep/typing.md", "type": "blob"},
                {"path": "rules/pythonic.md", "type": "blob"},
                {"path": "README.md", "type": "blob"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            blobs_under(&tree, &listing),
            vec![
                "https://github.com/acme/rules/blob/main/rules/python/deep/typing.md",
                "https://github.com/acme/rules/blob/main/rules/python/style.md",
            ]
        );
    }

    #[test]
    fn test_batch_groups_blobs_by_repository_and_branch() {
        let urls = vec![
            "https://github.com/acme/rules/blob/main/a.md".to_string(),
            "https://example.com/b.md".to_string(),
            "https://github.com/acme/rules/blob/dev/c.md".to_string(),
            "https://github.com/acme/rules/blob/main/sub/d.md".to_string(),
            "https://github.com/acme/rules/tree/main/sub".to_string(),
        ];
        let groups = group_blobs(&urls);
        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[&("acme/rules".to_string(), "main".to_string())],
            vec![
                (urls[0].clone(), "a.md".to_string()),
                (urls[3].clone(), "sub/d.md".to_string()),
            ]
        );

        assert_eq!(
            GhCliFetcher::new().fetch_batch(&urls[1..2]),
            Err(FetchError::Unsupported)
        );
    }

    #[test]
    fn test_batch_query_aliases_each_blob() {
        let blobs = vec![
            ("u0".to_string(), "a.md".to_string()),
            ("u1".to_string(), "docs/\"q\".md".to_string()),
        ];
        let query = batch_query("acme/rules", "main", &blobs).unwrap();
        assert_eq!(
            query,
            r#"query { repository(owner: "acme", name: "rules") { f0: object(expression: "main:a.md") { ... on Blob { text } } f1: object(expression: "main:docs/\"q\".md") { ... on Blob { text } } } }"#
        );
        assert!(batch_query("no-slash", "main", &blobs).is_none());
    }

    #[test]
    fn test_parse_batch_skips_null_objects() {
        let blobs = vec![
            ("u0".to_string(), "a.md".to_string()),
            ("u1".to_string(), "gone.md".to_string()),
            ("u2".to_string(), "logo.png".to_string()),
        ];
        let json = r##"{"data": {"repository": {
            "f0": {"text": "# A\n"},
            "f1": null,
            "f2": {"text": null}
        }}}"##;
        assert_eq!(
            parse_batch(json, &blobs),
            vec![("u0".to_string(), "# A\n".to_string())]
        );
        assert!(parse_batch("not json", &blobs).is_empty());
        assert!(parse_batch(r#"{"errors": []}"#, &blobs).is_empty());
    }

    #[test]
    fn test_offline_fetcher_always_fails() {
        let f = OfflineFetcher;
        assert!(f.fetch("https://example.com/a.md").is_err());
        assert!(f.fetch_batch(&["x".to_string()]).is_err());
        assert!(f.list_directory("https://github.com/a/b/tree/main").is_err());
    }

    #[test]
    fn test_tree_url_is_not_fetchable() {
        let err = GhCliFetcher::new()
            .fetch("https://github.com/a/b/tree/main/rules")
            .unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedUrl(_)));
    }
}
