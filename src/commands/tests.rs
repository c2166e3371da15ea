//! Tests for command handlers against temporary projects.

use super::build::build_with;
use super::check::check_with;
use super::servers::servers_with;
use super::*;
use crate::cli::BuildArgs;
use crate::diagnostics::CYCLE;
use crate::exit_codes;
use crate::test_support::{MemoryFetcher, RuleTree, assert_file};
use crate::warning::Warning;

fn project(yaml: &str) -> (RuleTree, ProjectContext) {
    let tree = RuleTree::new();
    tree.write("squash.yaml", yaml);
    let ctx = ProjectContext::resolve_with(tree.root(), None);
    (tree, ctx)
}

fn build_args(recipe: &str) -> BuildArgs {
    BuildArgs {
        recipe: recipe.to_string(),
        dest: None,
        preserve_frontmatter: false,
        essential_only: false,
        offline: false,
    }
}

#[test]
fn test_build_writes_into_project_root() {
    let (tree, ctx) = project("recipes:\n  core: [rules/a.md]\n");
    tree.write("rules/a.md", "---\nrequires: b.md\n---\n# A\n");
    tree.write("rules/b.md", "# B\n");

    let outcome = build_with(&ctx, &build_args("core"), &MemoryFetcher::new()).unwrap();
    assert_eq!(outcome.written, 1);
    assert_eq!(outcome.dest, tree.root());
    assert!(outcome.warnings.is_empty());
    assert_file(&tree.path("CLAUDE.md"), "# B\n\n# A\n");
}

#[test]
fn test_build_dest_is_relative_to_cwd() {
    let (tree, ctx) = project("recipes:\n  core: [rules/a.md]\n");
    tree.write("rules/a.md", "# A\n");

    let mut args = build_args("core");
    args.dest = Some("out".into());
    let outcome = build_with(&ctx, &args, &MemoryFetcher::new()).unwrap();
    assert_eq!(outcome.dest, tree.path("out"));
    assert_file(&tree.path("out/CLAUDE.md"), "# A\n");
}

#[test]
fn test_build_from_inside_a_skill_directory() {
    let (tree, _) = project("recipes:\n  core: [rules/a.md]\n");
    tree.write("rules/a.md", "---\nskills: skills/tdd/SKILL.md\n---\n# A\n");
    tree.write("rules/skills/tdd/SKILL.md", "---\nname: tdd\n---\nRed, green.\n");
    let ctx = ProjectContext::resolve_with(tree.path("rules/skills/tdd"), None);

    let outcome = build_with(&ctx, &build_args("core"), &MemoryFetcher::new()).unwrap();
    assert_eq!(outcome.dest, tree.root());
    assert!(tree.root().join("skills/tdd/SKILL.md").is_file());
    assert_file(&tree.path("CLAUDE.md"), "# A\n");
}

#[test]
fn test_build_from_inside_a_commands_directory() {
    let (tree, _) = project("recipes:\n  core: [rules/a.md, rules/commands/commit.md]\n");
    tree.write("rules/a.md", "# A\n");
    tree.write("rules/commands/commit.md", "Write a commit.\n");
    let ctx = ProjectContext::resolve_with(tree.path("rules/commands"), None);

    build_with(&ctx, &build_args("core"), &MemoryFetcher::new()).unwrap();
    assert_file(&tree.path("CLAUDE.md"), "# A\n");
    assert!(tree.root().join("commands/core/commit.md").is_file());
}

#[test]
fn test_github_url_climbing_out_of_the_repository_is_dropped() {
    let url = "https://github.com/a/b/blob/main/commands/../../../../escape.md";
    let (tree, ctx) = project(&format!("recipes:\n  core: [rules/a.md, \"{}\"]\n", url));
    tree.write("rules/a.md", "# A\n");
    let fetcher = MemoryFetcher::new().with_file(url, "escaped\n");

    let mut args = build_args("core");
    args.dest = Some("out/deep".into());
    let outcome = build_with(&ctx, &args, &fetcher).unwrap();

    assert_file(&tree.path("out/deep/CLAUDE.md"), "# A\n");
    assert!(!tree.root().join("escape.md").exists());
    assert!(!tree.root().join("out/escape.md").exists());
    assert!(outcome.warnings.iter().any(|w| matches!(
        w,
        Warning::ReadFailed { path, .. } if path == url
    )));
}

#[test]
fn test_failed_validation_writes_nothing() {
    let (tree, ctx) = project("recipes:\n  core: [rules/a.md, rules/b.md]\n");
    tree.write("rules/a.md", "# A\n");
    tree.write("rules/b.md", "---\nskills: skills/absent/SKILL.md\n---\n# B\n");

    let err = build_with(&ctx, &build_args("core"), &MemoryFetcher::new()).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);
    assert!(!tree.root().join("CLAUDE.md").exists());
}

#[test]
fn test_unknown_recipe_is_a_user_error() {
    let (_tree, ctx) = project("recipes: {}\n");
    let err = build_with(&ctx, &build_args("nope"), &MemoryFetcher::new()).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
}

#[test]
fn test_build_reports_soft_misses() {
    let (tree, ctx) = project("recipes:\n  core: [rules/a.md, rules/gone.md]\n");
    tree.write("rules/a.md", "# A\n");

    let outcome = build_with(&ctx, &build_args("core"), &MemoryFetcher::new()).unwrap();
    assert_eq!(
        outcome.warnings,
        vec![Warning::MissingFile {
            recipe: "core".into(),
            reference: "rules/gone.md".into(),
        }]
    );
    assert_file(&tree.path("CLAUDE.md"), "# A\n");
}

#[test]
fn test_config_enables_preserve_frontmatter() {
    let yaml = "output:\n  preserve_frontmatter: true\nrecipes:\n  core: [rules/a.md]\n";
    let (tree, ctx) = project(yaml);
    tree.write("rules/a.md", "---\ntitle: Alpha\nessential: true\n---\n# A\n");

    build_with(&ctx, &build_args("core"), &MemoryFetcher::new()).unwrap();
    let combined = std::fs::read_to_string(tree.path("CLAUDE.md")).unwrap();
    assert!(combined.starts_with("---\ntitle: Alpha\n---\n"));
    assert!(!combined.contains("essential"));
}

#[test]
fn test_servers_include_subagents() {
    let yaml = r#"
recipes:
  lead:
    mcp_servers: [github]
    subagents: [{ name: helper, recipe: help }]
  help:
    mcp_servers: [linear]
"#;
    let (_tree, ctx) = project(yaml);
    let names = servers_with(&ctx, "lead", &MemoryFetcher::new()).unwrap();
    assert_eq!(names, vec!["github", "linear"]);
}

#[test]
fn test_check_reports_cycles_as_errors() {
    let (tree, ctx) = project("recipes:\n  core: [rules/a.md]\n");
    tree.write("rules/a.md", "---\nrequires: b.md\n---\n");
    tree.write("rules/b.md", "---\nrequires: a.md\n---\n");

    let report = check_with(&ctx, None).unwrap();
    assert!(report.has_errors());
    assert_eq!(report.in_category(CYCLE).count(), 1);

    let err = cmd_check(&ctx, crate::cli::CheckArgs { recipe: None }).unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);
}

#[test]
fn test_check_warnings_do_not_fail() {
    let (tree, ctx) = project("recipes:\n  core: [rules/a.md]\n");
    tree.write("rules/a.md", "A");
    tree.write("rules/lonely.md", "L");

    assert!(cmd_check(&ctx, crate::cli::CheckArgs { recipe: None }).is_ok());
}

#[test]
fn test_render_report() {
    let (tree, ctx) = project("recipes:\n  core: [rules/a.md]\n");
    tree.write("rules/a.md", "---\nrequires: a.md\n---\n");
    tree.write("rules/lonely.md", "L");

    let text = render_report(&check_with(&ctx, None).unwrap());
    assert!(text.starts_with("Issues detected (2):\n"));
    assert!(text.contains("  1. [ERROR] cycle - file requires itself\n"));
    assert!(text.contains("     Path: rules/a.md -> rules/a.md\n"));
    assert!(text.contains("[WARNING] orphan - not reachable from any recipe"));
    assert!(text.ends_with("Summary: 1 errors, 1 warnings, 2 file(s) checked.\n"));

    let healthy = render_report(&crate::diagnostics::Report::default());
    assert!(healthy.starts_with("Rule tree is healthy."));
}

#[test]
fn test_render_list() {
    let yaml = r#"
recipes:
  core:
    description: Everyday rules
    files: [rules/a.md]
    subagents: [{ name: reviewer, recipe: review }]
  review: [rules/review.md]
"#;
    let config = crate::config::Config::from_yaml(yaml).unwrap();
    assert_eq!(
        render_list(&config),
        "core    Everyday rules  [subagents: reviewer]\nreview\n"
    );

    let empty = crate::config::Config::from_yaml("recipes: {}\n").unwrap();
    assert_eq!(render_list(&empty), "No recipes configured.\n");
}
