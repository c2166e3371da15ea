//! Error types for squash.
//!
//! Uses thiserror for derive macros. Hard validation failures carry their own
//! enum so callers can match on the exact rule that was violated; every
//! variant maps to a process exit code.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for squash operations.
#[derive(Error, Debug)]
pub enum SquashError {
    /// User provided invalid arguments or referenced something that does not exist.
    #[error("{0}")]
    UserError(String),

    /// Configuration could not be read, merged, or validated.
    #[error("Config error: {0}")]
    ConfigError(String),

    /// A recipe tree failed validation. Nothing was written.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// An artifact could not be written to the destination.
    #[error("Write failed: {0}")]
    WriteError(String),

    /// `check` found error-severity issues.
    #[error("{0}")]
    CheckFailed(String),
}

impl SquashError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SquashError::UserError(_) => exit_codes::USER_ERROR,
            SquashError::ConfigError(_) => exit_codes::CONFIG_ERROR,
            SquashError::Validation(_) => exit_codes::VALIDATION_FAILURE,
            SquashError::WriteError(_) => exit_codes::WRITE_FAILURE,
            SquashError::CheckFailed(_) => exit_codes::VALIDATION_FAILURE,
        }
    }
}

/// Hard validation failures. Any of these aborts the whole run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A `skills:` reference did not resolve to a file.
    #[error("skill '{reference}' declared in '{declared_in}' could not be found")]
    MissingSkill {
        reference: String,
        declared_in: String,
    },

    /// A `skills:` reference resolved outside any `skills` path segment.
    #[error(
        "skill '{reference}' declared in '{declared_in}' resolves to '{resolved}', which is not under a 'skills' directory"
    )]
    SkillOutsideSkillsDir {
        reference: String,
        declared_in: String,
        resolved: String,
    },

    /// A subagent entry points at a recipe that is not registered.
    #[error("subagent '{subagent}' of recipe '{owner}' references unknown recipe '{recipe}'")]
    UnknownSubagentRecipe {
        owner: String,
        subagent: String,
        recipe: String,
    },

    /// A subagent-target recipe declares subagents of its own.
    #[error(
        "recipe '{child}' is used as a subagent but declares its own subagents ({}); subagents cannot be nested, compose them with 'skills:' instead",
        .nested.join(", ")
    )]
    NestedSubagents { child: String, nested: Vec<String> },

    /// A file dispatches to a name missing from its recipe's subagent registry.
    #[error(
        "'{file}' dispatches to '{target}', which is not a registered subagent of recipe '{recipe}'"
    )]
    UnregisteredDispatch {
        recipe: String,
        file: String,
        target: String,
    },

    /// Files belonging to a subagent-target recipe declare `dispatches:`.
    #[error(
        "recipe '{recipe}' is used as a subagent, but these files declare 'dispatches:': {}",
        .files.join(", ")
    )]
    SubagentDispatches { recipe: String, files: Vec<String> },
}

/// Result type alias for squash operations.
pub type Result<T> = std::result::Result<T, SquashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_have_correct_exit_codes() {
        assert_eq!(
            SquashError::UserError("x".into()).exit_code(),
            exit_codes::USER_ERROR
        );
        assert_eq!(
            SquashError::ConfigError("x".into()).exit_code(),
            exit_codes::CONFIG_ERROR
        );
        assert_eq!(
            SquashError::WriteError("x".into()).exit_code(),
            exit_codes::WRITE_FAILURE
        );
        let err: SquashError = ValidationError::MissingSkill {
            reference: "a".into(),
            declared_in: "b".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);
    }

    #[test]
    fn nested_subagent_message_names_child_and_its_subagents() {
        let err = ValidationError::NestedSubagents {
            child: "reviewer".into(),
            nested: vec!["linter".into(), "formatter".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("reviewer"));
        assert!(msg.contains("linter, formatter"));
        assert!(msg.contains("skills:"));
    }

    #[test]
    fn subagent_dispatch_message_lists_every_file() {
        let err = ValidationError::SubagentDispatches {
            recipe: "child".into(),
            files: vec!["a.md".into(), "b.md".into()],
        };
        assert!(err.to_string().ends_with("a.md, b.md"));
    }
}
