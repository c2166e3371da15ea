//! Command implementations for squash.
//!
//! Routes CLI commands to their handlers. Every handler takes the resolved
//! project context so it can be exercised against a temporary rule tree.

mod build;
mod check;
mod list;
mod servers;

#[cfg(test)]
mod tests;

pub use build::cmd_build;
pub use check::{cmd_check, render_report};
pub use list::{cmd_list, render_list};
pub use servers::cmd_servers;

use crate::cli::Command;
use crate::config::Config;
use crate::context::ProjectContext;
use crate::engine::Engine;
use crate::error::Result;
use crate::remote::RemoteFetcher;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    let ctx = ProjectContext::resolve()?;
    match command {
        Command::Build(args) => cmd_build(&ctx, args),
        Command::List => cmd_list(&ctx),
        Command::Servers(args) => cmd_servers(&ctx, args),
        Command::Check(args) => cmd_check(&ctx, args),
    }
}

/// Wire an engine to the context's canonicalizer and rule roots.
fn engine<'a>(
    ctx: &ProjectContext,
    config: &'a Config,
    fetcher: &'a dyn RemoteFetcher,
) -> Engine<'a> {
    Engine::new(
        config,
        fetcher,
        ctx.canonicalizer(),
        ctx.rule_roots(&config.rules_dir),
    )
}
