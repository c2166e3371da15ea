//! Tests for MCP server aggregation.

use super::*;
use crate::config::Config;
use crate::engine::Engine;
use crate::test_support::{MemoryFetcher, RuleTree};

fn servers(tree: &RuleTree, yaml: &str, recipe: &str) -> Vec<String> {
    let config = Config::from_yaml(yaml).unwrap();
    let fetcher = MemoryFetcher::new();
    let mut engine = Engine::new(&config, &fetcher, tree.canonicalizer(), tree.rule_roots());
    engine.mcp_servers(recipe).unwrap().into_iter().collect()
}

#[test]
fn test_union_of_own_and_subagent_servers() {
    let tree = RuleTree::new();
    let yaml = r#"
recipes:
  q:
    mcp_servers: [x]
    subagents: [{ name: t, recipe: u }]
  u:
    mcp_servers: [y]
"#;
    assert_eq!(servers(&tree, yaml, "q"), vec!["x", "y"]);
}

#[test]
fn test_self_referential_subagent_terminates() {
    let tree = RuleTree::new();
    let yaml = r#"
recipes:
  v:
    mcp_servers: [own]
    subagents: [{ name: w, recipe: v }]
"#;
    assert_eq!(servers(&tree, yaml, "v"), vec!["own"]);
}

#[test]
fn test_mutual_subagent_cycle_terminates() {
    let tree = RuleTree::new();
    let yaml = r#"
recipes:
  a:
    mcp_servers: [one]
    subagents: [{ name: to-b, recipe: b }]
  b:
    mcp_servers: [two]
    subagents: [{ name: to-a, recipe: a }]
"#;
    assert_eq!(servers(&tree, yaml, "a"), vec!["one", "two"]);
}

#[test]
fn test_file_directives_contribute_servers() {
    let tree = RuleTree::new();
    tree.write("rules/a.md", "---\nmcp_servers: [from-file, shared]\n---\nA");
    let yaml = r#"
recipes:
  r:
    files: [rules/a.md]
    mcp_servers: [shared]
"#;
    assert_eq!(servers(&tree, yaml, "r"), vec!["from-file", "shared"]);
}

#[test]
fn test_unknown_subagent_recipe_is_skipped() {
    let tree = RuleTree::new();
    let yaml = r#"
recipes:
  r:
    mcp_servers: [x]
    subagents: [{ name: s, recipe: ghost }]
"#;
    assert_eq!(servers(&tree, yaml, "r"), vec!["x"]);
}

#[test]
fn test_manifest_reports_undefined_names() {
    let config = Config::from_yaml("mcp_servers:\n  x: { url: \"http://localhost:1\" }\n").unwrap();
    let names: BTreeSet<String> = ["x".to_string(), "y".to_string()].into_iter().collect();

    let (manifest, warnings) = McpConfig::from_names(&names, &config.mcp_servers);
    assert_eq!(manifest.mcp_servers.len(), 1);
    assert_eq!(
        warnings,
        vec![Warning::UndefinedServer { name: "y".into() }]
    );
    let json: serde_json::Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();
    assert_eq!(json["mcpServers"]["x"]["url"], "http://localhost:1");
}
