//! Implementation of the `squash check` command.
//!
//! Read-only. Reports orphan rule files, `requires:` cycles, missing
//! `requires:` targets, and unparseable frontmatter. Cycles are errors and
//! fail the command; everything else is a warning.

use super::engine;
use crate::cli::CheckArgs;
use crate::context::ProjectContext;
use crate::diagnostics::{IssueSeverity, Report};
use crate::error::{Result, SquashError};
use crate::remote::OfflineFetcher;
use std::fmt::Write;

/// Execute the `squash check` command.
pub fn cmd_check(ctx: &ProjectContext, args: CheckArgs) -> Result<()> {
    let report = check_with(ctx, args.recipe.as_deref())?;
    print!("{}", render_report(&report));

    if report.has_errors() {
        return Err(SquashError::CheckFailed(format!(
            "Found {} error(s) in the rule tree.",
            report.count(IssueSeverity::Error)
        )));
    }
    Ok(())
}

pub(crate) fn check_with(ctx: &ProjectContext, recipe: Option<&str>) -> Result<Report> {
    let config = ctx.load_config()?;
    let fetcher = OfflineFetcher;
    engine(ctx, &config, &fetcher).diagnose(recipe)
}

/// Human-readable report.
pub fn render_report(report: &Report) -> String {
    let mut out = String::new();
    if !report.has_issues() {
        let _ = writeln!(
            out,
            "Rule tree is healthy. {} file(s) checked, no issues detected.",
            report.files_checked
        );
        return out;
    }

    let _ = writeln!(out, "Issues detected ({}):", report.issues.len());
    let _ = writeln!(out);

    for (i, issue) in report.issues.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. [{}] {} - {}",
            i + 1,
            issue.severity,
            issue.category,
            issue.description
        );
        if let Some(path) = &issue.path {
            let _ = writeln!(out, "     Path: {}", path);
        }
        if let Some(remediation) = &issue.remediation {
            let _ = writeln!(out, "     Fix:  {}", remediation);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "Summary: {} errors, {} warnings, {} file(s) checked.",
        report.count(IssueSeverity::Error),
        report.count(IssueSeverity::Warning),
        report.files_checked
    );
    out
}
