//! Non-fatal problems collected during a run.
//!
//! Soft-misses and collaborator failures never change whether a build
//! succeeds. They are gathered into a list and reported once at the end.

use thiserror::Error;

/// A single non-fatal problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A recipe `files:` or `sources:` entry does not exist.
    #[error("recipe '{recipe}': '{reference}' not found, skipping")]
    MissingFile { recipe: String, reference: String },

    /// A remote document could not be fetched by any strategy.
    #[error("could not fetch '{url}': {reason}")]
    FetchFailed { url: String, reason: String },

    /// A GitHub directory could not be listed.
    #[error("could not list '{url}': {reason}")]
    ListingFailed { url: String, reason: String },

    /// A local document could not be read.
    #[error("could not read '{path}': {reason}")]
    ReadFailed { path: String, reason: String },

    /// A document's frontmatter is not valid YAML; its directives were ignored.
    #[error("malformed frontmatter in '{file}': {reason}")]
    MalformedFrontmatter { file: String, reason: String },

    /// A `scripts:` entry could not be resolved.
    #[error("script '{reference}' declared in '{declared_in}' not found, skipping")]
    MissingScript {
        reference: String,
        declared_in: String,
    },

    /// A required MCP server has no definition in config.
    #[error("MCP server '{name}' is required but has no definition in config")]
    UndefinedServer { name: String },

    /// Commands are not emitted for subagent recipes.
    #[error("subagent '{subagent}': command '{file}' ignored (subagents cannot provide commands)")]
    SubagentCommandIgnored { subagent: String, file: String },

    /// A recipe `files:` glob pattern is invalid.
    #[error("recipe '{recipe}': invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        recipe: String,
        pattern: String,
        reason: String,
    },

    /// An output path would land outside the destination directory.
    #[error("refusing to emit '{path}' outside the destination")]
    UnsafeArtifactPath { path: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_messages_name_the_reference() {
        let w = Warning::MissingFile {
            recipe: "core".into(),
            reference: "rules/gone.md".into(),
        };
        assert_eq!(
            w.to_string(),
            "recipe 'core': 'rules/gone.md' not found, skipping"
        );

        let w = Warning::UndefinedServer {
            name: "github".into(),
        };
        assert!(w.to_string().contains("github"));
    }
}
