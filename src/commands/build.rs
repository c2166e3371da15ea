//! Implementation of the `squash build` command.
//!
//! Load, resolve, and validate the whole recipe tree, plan every artifact,
//! and only then write. A validation failure leaves the destination
//! untouched.

use super::engine;
use crate::cli::BuildArgs;
use crate::context::ProjectContext;
use crate::emit::{self, PlanOptions};
use crate::error::Result;
use crate::remote::{GhCliFetcher, OfflineFetcher, RemoteFetcher};
use crate::warning::Warning;
use std::path::PathBuf;

/// What a finished build produced.
#[derive(Debug)]
pub(crate) struct BuildOutcome {
    pub written: usize,
    pub dest: PathBuf,
    pub warnings: Vec<Warning>,
}

/// Execute the `squash build` command.
pub fn cmd_build(ctx: &ProjectContext, args: BuildArgs) -> Result<()> {
    let online = GhCliFetcher::new();
    let offline = OfflineFetcher;
    let fetcher: &dyn RemoteFetcher = if args.offline { &offline } else { &online };

    let outcome = build_with(ctx, &args, fetcher)?;
    for warning in &outcome.warnings {
        tracing::warn!("{}", warning);
    }
    println!(
        "Built '{}': {} artifact(s) -> {}",
        args.recipe,
        outcome.written,
        outcome.dest.display()
    );
    Ok(())
}

pub(crate) fn build_with(
    ctx: &ProjectContext,
    args: &BuildArgs,
    fetcher: &dyn RemoteFetcher,
) -> Result<BuildOutcome> {
    let config = ctx.load_config()?;
    let mut engine = engine(ctx, &config, fetcher);
    let tree = engine.build(&args.recipe)?;

    let options = PlanOptions {
        combined: config.output.combined.clone(),
        preserve_frontmatter: args.preserve_frontmatter || config.output.preserve_frontmatter,
        essential_only: args.essential_only,
    };
    let plan = emit::plan(&tree, &options, &config.mcp_servers)?;

    let dest = match &args.dest {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => ctx.cwd.join(dir),
        None => ctx.project_root.clone(),
    };
    let written = emit::write(&plan, &dest)?;

    let mut warnings: Vec<Warning> = tree.warnings().cloned().collect();
    warnings.extend(plan.warnings.iter().cloned());
    Ok(BuildOutcome {
        written,
        dest,
        warnings,
    })
}
