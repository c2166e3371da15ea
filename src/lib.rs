//! Squash: compile markdown rule recipes into assistant artifacts.
//!
//! A recipe names rule files, local or remote. The engine follows their
//! `requires:` and `skills:` directives into one ordered, deduplicated list,
//! validates the one-level subagent tree, aggregates the MCP servers the
//! whole tree needs, and plans every output file before any is written.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod emit;
pub mod engine;
pub mod error;
pub mod exit_codes;
pub mod frontmatter;
pub mod fs;
pub mod loader;
pub mod logging;
pub mod mcp;
pub mod registry;
pub mod remote;
pub mod resolver;
pub mod source;
pub mod subagent;
pub mod warning;

#[cfg(test)]
mod test_support;

pub use engine::Engine;
pub use error::{Result, SquashError, ValidationError};
pub use warning::Warning;
