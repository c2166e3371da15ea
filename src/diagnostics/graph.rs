//! Reference graph over local rule files.

use crate::frontmatter::Document;
use crate::source::{Canonicalizer, Identity, path_segments};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
struct Node {
    requires: Vec<PathBuf>,
    /// `skills:` and inline `@path.md` targets.
    links: Vec<PathBuf>,
    missing_requires: Vec<String>,
    malformed: Option<String>,
}

/// Every local file reachable from a set of entry points, plus every
/// markdown file under the rule roots, with their outgoing references.
#[derive(Debug, Clone, Default)]
pub struct RuleGraph {
    roots: Vec<PathBuf>,
    universe: BTreeSet<PathBuf>,
    reachable: BTreeSet<PathBuf>,
    nodes: BTreeMap<PathBuf, Node>,
}

impl RuleGraph {
    /// Scan `entries` transitively, then the rest of `universe`.
    pub fn build(
        canonicalizer: &Canonicalizer,
        universe: impl IntoIterator<Item = PathBuf>,
        entries: &[Identity],
    ) -> Self {
        let mut graph = Self {
            roots: canonicalizer.segment_roots().roots().to_vec(),
            universe: universe.into_iter().collect(),
            ..Default::default()
        };

        let mut queue: VecDeque<PathBuf> = entries
            .iter()
            .filter_map(|i| i.as_local().cloned())
            .collect();
        while let Some(path) = queue.pop_front() {
            if !graph.reachable.insert(path.clone()) {
                continue;
            }
            let node = graph.scan(canonicalizer, &path);
            queue.extend(node.requires.iter().chain(node.links.iter()).cloned());
        }

        let rest: Vec<PathBuf> = graph
            .universe
            .iter()
            .filter(|p| !graph.nodes.contains_key(*p))
            .cloned()
            .collect();
        for path in rest {
            graph.scan(canonicalizer, &path);
        }
        graph
    }

    fn scan(&mut self, canonicalizer: &Canonicalizer, path: &Path) -> Node {
        if let Some(node) = self.nodes.get(path) {
            return node.clone();
        }

        let mut node = Node::default();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let (doc, err) = Document::parse_lenient(&content);
                node.malformed = err.map(|e| e.to_string());

                let declaring = Identity::Local(path.to_path_buf());
                for reference in &doc.directives.requires {
                    match local_file(canonicalizer, &declaring, reference) {
                        Some(target) => node.requires.push(target),
                        None => node.missing_requires.push(reference.clone()),
                    }
                }
                for reference in doc.directives.skills.iter().chain(&doc.inline_references()) {
                    if let Some(target) = local_file(canonicalizer, &declaring, reference) {
                        node.links.push(target);
                    }
                }
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "skipping unreadable file");
            }
        }

        self.nodes.insert(path.to_path_buf(), node.clone());
        node
    }

    /// Number of files scanned.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Universe files no entry point reaches.
    pub fn orphans(&self) -> Vec<PathBuf> {
        self.universe
            .difference(&self.reachable)
            .cloned()
            .collect()
    }

    pub fn requires_edges(&self) -> BTreeMap<PathBuf, Vec<PathBuf>> {
        self.nodes
            .iter()
            .map(|(path, node)| (path.clone(), node.requires.clone()))
            .collect()
    }

    pub fn missing_requires(&self) -> Vec<(&PathBuf, &str)> {
        self.nodes
            .iter()
            .flat_map(|(path, node)| {
                node.missing_requires
                    .iter()
                    .map(move |r| (path, r.as_str()))
            })
            .collect()
    }

    pub fn malformed(&self) -> Vec<(&PathBuf, &str)> {
        self.nodes
            .iter()
            .filter_map(|(path, node)| node.malformed.as_deref().map(|m| (path, m)))
            .collect()
    }

    /// Search-root-relative display form of a path.
    pub fn display(&self, path: &Path) -> String {
        path_segments(&Identity::Local(path.to_path_buf()), &self.roots).join("/")
    }
}

fn local_file(canonicalizer: &Canonicalizer, declaring: &Identity, reference: &str) -> Option<PathBuf> {
    match canonicalizer.canonicalize(Some(declaring), reference)? {
        Identity::Local(path) if path.is_file() => Some(path),
        _ => None,
    }
}
