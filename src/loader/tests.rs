//! Tests for recipe loading.

use super::*;
use crate::config::Config;
use crate::test_support::{MemoryFetcher, RuleTree};

fn load(tree: &RuleTree, fetcher: &MemoryFetcher, yaml: &str, name: &str) -> LoadedRecipe {
    let config = Config::from_yaml(yaml).unwrap();
    let canon = tree.canonicalizer();
    let roots = tree.rule_roots();
    Loader::new(&canon, fetcher, &roots).load(name, &config.recipes[name])
}

fn references(loaded: &LoadedRecipe) -> Vec<String> {
    loaded.sources.iter().map(|s| s.reference.clone()).collect()
}

#[test]
fn test_files_in_declaration_order() {
    let tree = RuleTree::new();
    let b = tree.write("rules/b.md", "B");
    let a = tree.write("rules/a.md", "A");
    let fetcher = MemoryFetcher::new();

    let loaded = load(&tree, &fetcher, "recipes:\n  r: [rules/b.md, rules/a.md]\n", "r");
    assert_eq!(
        references(&loaded),
        vec![b.display().to_string(), a.display().to_string()]
    );
    assert!(loaded.warnings.is_empty());
}

#[test]
fn test_directory_expands_sorted_with_bin_scripts() {
    let tree = RuleTree::new();
    let z = tree.write("rules/pack/z.md", "Z");
    let a = tree.write("rules/pack/nested/a.md", "A");
    let sh = tree.write("rules/pack/bin/setup.sh", "#!/bin/sh");
    tree.write("rules/pack/notes.txt", "ignored");
    tree.write("rules/pack/stray.sh", "not under bin");
    tree.write("rules/pack/.hidden/x.md", "hidden");
    let fetcher = MemoryFetcher::new();

    let loaded = load(&tree, &fetcher, "recipes:\n  r: [rules/pack]\n", "r");
    let mut expected = vec![z, a, sh];
    expected.sort();
    let expected: Vec<String> = expected.iter().map(|p| p.display().to_string()).collect();
    assert_eq!(references(&loaded), expected);
}

#[test]
fn test_missing_file_becomes_warning() {
    let tree = RuleTree::new();
    tree.write("rules/a.md", "A");
    let fetcher = MemoryFetcher::new();

    let loaded = load(&tree, &fetcher, "recipes:\n  r: [rules/a.md, rules/gone.md]\n", "r");
    assert_eq!(loaded.sources.len(), 1);
    assert_eq!(
        loaded.warnings,
        vec![Warning::MissingFile {
            recipe: "r".into(),
            reference: "rules/gone.md".into(),
        }]
    );
}

#[test]
fn test_glob_entries_match_within_one_directory_level() {
    let tree = RuleTree::new();
    let a = tree.write("rules/lang/a.md", "A");
    let b = tree.write("rules/lang/b.md", "B");
    tree.write("rules/lang/deep/c.md", "C");
    let fetcher = MemoryFetcher::new();

    let loaded = load(&tree, &fetcher, "recipes:\n  r: [\"rules/lang/*.md\"]\n", "r");
    assert_eq!(
        references(&loaded),
        vec![a.display().to_string(), b.display().to_string()]
    );
}

#[test]
fn test_glob_with_no_match_warns() {
    let tree = RuleTree::new();
    tree.write("rules/a.md", "A");
    let fetcher = MemoryFetcher::new();

    let loaded = load(&tree, &fetcher, "recipes:\n  r: [\"rules/none/*.md\"]\n", "r");
    assert!(loaded.sources.is_empty());
    assert_eq!(loaded.warnings.len(), 1);
}

#[test]
fn test_sources_and_remote_sources() {
    let tree = RuleTree::new();
    let local = tree.write("rules/local.md", "L");
    let fetcher = MemoryFetcher::new();
    let yaml = r#"
recipes:
  r:
    sources:
      - rules/local.md
      - https://example.com/remote.md
    remote_sources:
      - https://example.com/legacy.md
"#;

    let loaded = load(&tree, &fetcher, yaml, "r");
    assert_eq!(
        references(&loaded),
        vec![
            local.display().to_string(),
            "https://example.com/remote.md".to_string(),
            "https://example.com/legacy.md".to_string(),
        ]
    );
}

#[test]
fn test_github_rules_list_directories_and_keep_files() {
    let tree = RuleTree::new();
    let fetcher = MemoryFetcher::new().with_listing(
        "https://github.com/acme/rules/tree/main/python",
        &[
            "https://github.com/acme/rules/blob/main/python/z.md",
            "https://github.com/acme/rules/blob/main/python/a.md",
            "https://github.com/acme/rules/blob/main/python/script.py",
        ],
    );
    let yaml = r#"
recipes:
  r:
    sources:
      - { github: acme/rules, rules: [python, docs/intro.md] }
"#;

    let loaded = load(&tree, &fetcher, yaml, "r");
    assert_eq!(
        references(&loaded),
        vec![
            "https://github.com/acme/rules/blob/main/python/a.md",
            "https://github.com/acme/rules/blob/main/python/z.md",
            "https://github.com/acme/rules/blob/main/docs/intro.md",
        ]
    );
    assert!(loaded.warnings.is_empty());
}

#[test]
fn test_github_listing_failure_becomes_warning() {
    let tree = RuleTree::new();
    let fetcher = MemoryFetcher::new();
    let yaml = r#"
recipes:
  r:
    sources:
      - { github: acme/rules, branch: dev, rules: [python] }
"#;

    let loaded = load(&tree, &fetcher, yaml, "r");
    assert!(loaded.sources.is_empty());
    assert!(matches!(
        &loaded.warnings[..],
        [Warning::ListingFailed { url, .. }] if url == "https://github.com/acme/rules/tree/dev/python"
    ));
}

#[test]
fn test_tagged_files_join_after_declared_ones() {
    let tree = RuleTree::new();
    let declared = tree.write("rules/declared.md", "---\nrecipes: [r]\n---\nD");
    let tagged = tree.write("rules/extra/tagged.md", "---\nrecipes: r\n---\nT");
    tree.write("rules/other.md", "---\nrecipes: [someone-else]\n---\nO");
    let fetcher = MemoryFetcher::new();

    let loaded = load(&tree, &fetcher, "recipes:\n  r: [rules/declared.md]\n", "r");
    assert_eq!(
        references(&loaded),
        vec![declared.display().to_string(), tagged.display().to_string()]
    );
}
