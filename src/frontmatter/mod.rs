//! Frontmatter directive reader for rule documents.
//!
//! Rule documents are markdown files with an optional YAML frontmatter block
//! delimited by `---` lines:
//!
//! ```text
//! ---
//! description: Testing conventions
//! requires: [../shared/style.md]
//! skills: [../skills/tdd/SKILL.md]
//! ---
//!
//! # Testing
//! ...
//! ```
//!
//! Parsing is pure: no I/O, no path resolution. Recognized directive keys
//! steer resolution and are stripped on emission; every other key is passed
//! through untouched.

mod directives;
mod render;


pub use directives::{Directives, ScriptsDirective};
pub use render::KeepFields;

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Frontmatter keys that control resolution and are never emitted.
pub const DIRECTIVE_KEYS: [&str; 7] = [
    "requires",
    "skills",
    "dispatches",
    "mcp_servers",
    "essential",
    "recipes",
    "scripts",
];

/// Frontmatter keys the assistant itself consumes. Always emitted on
/// standalone artifacts.
pub const PASSTHROUGH_KEYS: [&str; 4] = ["name", "description", "model", "permissionMode"];

static INLINE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:^|\s)@([^\s@`]+\.md)").expect("Invalid inline reference regex")
});

/// Why a frontmatter block could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrontmatterError {
    /// The block is not valid YAML, or a directive has the wrong shape.
    #[error("{0}")]
    Yaml(String),

    /// The block parsed, but not to a mapping.
    #[error("frontmatter must be a mapping")]
    NotAMapping,
}

/// A parsed rule document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Typed directives read from the frontmatter.
    pub directives: Directives,
    /// Every frontmatter field, in source order.
    pub fields: serde_yaml::Mapping,
    /// Everything after the closing delimiter.
    pub body: String,
    /// Whether the document opened with a complete frontmatter block.
    pub has_frontmatter: bool,
}

impl Document {
    /// Parse a document from its raw text.
    ///
    /// Text without a complete `---` block is all body. Both LF and CRLF
    /// line endings are accepted; the body is preserved byte-for-byte.
    pub fn parse(content: &str) -> Result<Self, FrontmatterError> {
        let Some((yaml, body)) = split_frontmatter(content) else {
            return Ok(Self {
                body: content.to_string(),
                ..Default::default()
            });
        };

        let value: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|e| FrontmatterError::Yaml(e.to_string()))?;
        let fields = match value {
            serde_yaml::Value::Null => serde_yaml::Mapping::new(),
            serde_yaml::Value::Mapping(map) => map,
            _ => return Err(FrontmatterError::NotAMapping),
        };

        let directives: Directives =
            serde_yaml::from_value(serde_yaml::Value::Mapping(fields.clone()))
                .map_err(|e| FrontmatterError::Yaml(e.to_string()))?;

        Ok(Self {
            directives,
            fields,
            body: body.to_string(),
            has_frontmatter: true,
        })
    }

    /// Parse a document, degrading a bad frontmatter block to plain content.
    ///
    /// Returns the parse error alongside so the caller can report it.
    pub fn parse_lenient(content: &str) -> (Self, Option<FrontmatterError>) {
        match Self::parse(content) {
            Ok(doc) => (doc, None),
            Err(err) => (
                Self {
                    body: content.to_string(),
                    ..Default::default()
                },
                Some(err),
            ),
        }
    }

    /// Look up a pass-through string field such as `name` or `description`.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_str())
    }

    /// `@path.md` references written inline in the body.
    pub fn inline_references(&self) -> Vec<String> {
        INLINE_REFERENCE
            .captures_iter(&self.body)
            .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}

/// Split raw text into (frontmatter yaml, body), if a complete block exists.
fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}
