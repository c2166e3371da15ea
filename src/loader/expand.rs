//! Filesystem expansion of directory and glob entries.

use crate::frontmatter::Document;
use globset::GlobBuilder;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Every markdown file under `dir`, plus `.sh` files inside a `bin`
/// directory, canonicalized and sorted.
pub fn expand_dir(dir: &Path) -> Vec<PathBuf> {
    let dir_is_bin = dir.file_name().is_some_and(|n| n == "bin");
    let mut files: Vec<PathBuf> = walk_files(dir)
        .filter(|path| {
            let relative = path.strip_prefix(dir).unwrap_or(path);
            match path.extension().and_then(|e| e.to_str()) {
                Some("md") => true,
                Some("sh") => dir_is_bin || relative.components().any(|c| c.as_os_str() == "bin"),
                _ => false,
            }
        })
        .filter_map(|p| dunce::canonicalize(p).ok())
        .collect();
    files.sort();
    files.dedup();
    files
}

/// Whether a `files:` entry is a glob pattern rather than a path.
pub fn is_glob(entry: &str) -> bool {
    entry.contains(['*', '?', '[', '{'])
}

/// Files under `root` whose root-relative path matches `pattern`, sorted.
pub fn expand_glob(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, String> {
    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| e.to_string())?
        .compile_matcher();

    let literal: PathBuf = Path::new(pattern)
        .components()
        .take_while(|c| !is_glob(&c.as_os_str().to_string_lossy()))
        .collect();
    let start = root.join(&literal);
    if !start.is_dir() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = walk_files(&start)
        .filter(|path| {
            path.strip_prefix(root)
                .map(|rel| matcher.is_match(rel))
                .unwrap_or(false)
        })
        .filter_map(|p| dunce::canonicalize(p).ok())
        .collect();
    files.sort();
    files.dedup();
    Ok(files)
}

/// Markdown files under the rule roots that opt into `recipe` through a
/// `recipes:` directive, sorted.
pub fn tagged_files(rule_roots: &[PathBuf], recipe: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = rule_roots
        .iter()
        .flat_map(|root| walk_files(root).collect::<Vec<_>>())
        .filter(|p| p.extension().is_some_and(|e| e == "md"))
        .filter(|p| {
            std::fs::read_to_string(p)
                .map(|content| {
                    let (doc, _) = Document::parse_lenient(&content);
                    doc.directives.recipes.iter().any(|r| r == recipe)
                })
                .unwrap_or(false)
        })
        .filter_map(|p| dunce::canonicalize(p).ok())
        .collect();
    files.sort();
    files.dedup();
    files
}

/// Every markdown file under the rule roots, canonicalized and sorted.
pub fn all_markdown(rule_roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = rule_roots
        .iter()
        .flat_map(|root| walk_files(root).collect::<Vec<_>>())
        .filter(|p| p.extension().is_some_and(|e| e == "md"))
        .filter_map(|p| dunce::canonicalize(p).ok())
        .collect();
    files.sort();
    files.dedup();
    files
}

/// Regular files under `dir`, skipping hidden entries, in file-name order.
fn walk_files(dir: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(DirEntry::into_path)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
