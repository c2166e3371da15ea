//! Rule tree health checks.
//!
//! Read-only analyses over local rule files:
//! - orphans: files under the rule roots no recipe reaches
//! - `requires:` cycles, each distinct cycle reported once
//! - `requires:` targets that do not exist
//! - frontmatter that does not parse
//!
//! Reachability follows `requires:`, `skills:`, and inline `@path.md`
//! references. Remote documents are never fetched here.

mod cycles;
mod graph;


pub use cycles::find_cycles;
pub use graph::RuleGraph;

use std::fmt;

/// Severity level for issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Worth a look; the build still works.
    Warning,
    /// The rule tree is broken.
    Error,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueSeverity::Warning => write!(f, "WARNING"),
            IssueSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// A detected issue with a recommended fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub severity: IssueSeverity,
    pub category: String,
    pub description: String,
    /// File or files involved.
    pub path: Option<String>,
    pub remediation: Option<String>,
}

impl Issue {
    pub fn new(severity: IssueSeverity, category: &str, description: &str) -> Self {
        Self {
            severity,
            category: category.to_string(),
            description: description.to_string(),
            path: None,
            remediation: None,
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    pub fn with_remediation(mut self, remediation: &str) -> Self {
        self.remediation = Some(remediation.to_string());
        self
    }
}

/// Result of a health check.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub issues: Vec<Issue>,
    /// Number of local files examined.
    pub files_checked: usize,
}

impl Report {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == IssueSeverity::Error)
    }

    pub fn count(&self, severity: IssueSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn in_category<'r>(&'r self, category: &'r str) -> impl Iterator<Item = &'r Issue> {
        self.issues.iter().filter(move |i| i.category == category)
    }
}

pub const ORPHAN: &str = "orphan";
pub const CYCLE: &str = "cycle";
pub const MISSING_REQUIRE: &str = "missing-require";
pub const FRONTMATTER: &str = "frontmatter";

/// Build the report for a scanned graph.
///
/// Orphans are only reported when `check_orphans` is set, since they only
/// mean something when every recipe was loaded.
pub fn report(graph: &RuleGraph, check_orphans: bool) -> Report {
    let mut report = Report {
        files_checked: graph.len(),
        ..Default::default()
    };

    for (file, reason) in graph.malformed() {
        report.issues.push(
            Issue::new(
                IssueSeverity::Warning,
                FRONTMATTER,
                &format!("frontmatter does not parse, directives ignored: {}", reason),
            )
            .with_path(&graph.display(file)),
        );
    }

    for (file, reference) in graph.missing_requires() {
        report.issues.push(
            Issue::new(
                IssueSeverity::Warning,
                MISSING_REQUIRE,
                &format!("requires '{}', which does not exist", reference),
            )
            .with_path(&graph.display(file))
            .with_remediation("Fix the path or remove the entry from 'requires:'"),
        );
    }

    for cycle in find_cycles(&graph.requires_edges()) {
        let mut members: Vec<String> = cycle.iter().map(|p| graph.display(p)).collect();
        let description = if members.len() == 1 {
            "file requires itself".to_string()
        } else {
            format!("{} files require each other in a loop", members.len())
        };
        if let Some(first) = members.first().cloned() {
            members.push(first);
        }
        report.issues.push(
            Issue::new(IssueSeverity::Error, CYCLE, &description)
                .with_path(&members.join(" -> "))
                .with_remediation("Break the loop by removing one 'requires:' entry"),
        );
    }

    if check_orphans {
        for file in graph.orphans() {
            report.issues.push(
                Issue::new(
                    IssueSeverity::Warning,
                    ORPHAN,
                    "not reachable from any recipe",
                )
                .with_path(&graph.display(&file))
                .with_remediation(
                    "Add it to a recipe's 'files:', tag it with 'recipes:', or delete it",
                ),
            );
        }
    }

    report
}
