//! CLI argument parsing for squash.
//!
//! Uses clap derive macros for declarative argument definitions.
//! Implementations live in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Squash: compile markdown rule recipes into assistant artifacts.
///
/// A recipe names rule files (local or remote). Squash follows their
/// `requires:` and `skills:` directives, validates the subagent tree, and
/// writes a combined document plus command, skill, agent, and script files.
#[derive(Parser, Debug)]
#[command(name = "squash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for squash.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a recipe into its artifacts.
    ///
    /// Resolves every file the recipe reaches, validates skills and
    /// subagents, then writes all artifacts. Nothing is written when
    /// validation fails.
    Build(BuildArgs),

    /// List configured recipes.
    List,

    /// Show the MCP servers a recipe needs.
    ///
    /// Includes servers required by the recipe's files and subagents.
    Servers(ServersArgs),

    /// Diagnose rule tree health.
    ///
    /// Reports orphan files, `requires:` cycles, missing `requires:`
    /// targets, and unparseable frontmatter.
    Check(CheckArgs),
}

/// Arguments for the `build` command.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Recipe to build.
    pub recipe: String,

    /// Destination directory (defaults to the project root).
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Keep non-directive frontmatter fields in emitted content.
    #[arg(long)]
    pub preserve_frontmatter: bool,

    /// Only include files marked `essential: true` in combined content.
    #[arg(long)]
    pub essential_only: bool,

    /// Skip remote sources instead of fetching them.
    #[arg(long)]
    pub offline: bool,
}

/// Arguments for the `servers` command.
#[derive(Parser, Debug)]
pub struct ServersArgs {
    /// Recipe to inspect.
    pub recipe: String,

    /// Skip remote sources instead of fetching them.
    #[arg(long)]
    pub offline: bool,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Only check the files this recipe reaches (skips orphan detection).
    #[arg(long)]
    pub recipe: Option<String>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
