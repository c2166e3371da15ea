//! Re-emitting a document with its directives stripped.

use super::{DIRECTIVE_KEYS, Document, PASSTHROUGH_KEYS};

/// Which frontmatter fields survive emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepFields {
    /// Drop the whole block.
    Nothing,
    /// Keep `name`, `description`, `model`, `permissionMode`.
    Passthrough,
    /// Keep every field that is not a directive.
    NonDirective,
}

impl KeepFields {
    fn keeps(self, key: &str) -> bool {
        match self {
            KeepFields::Nothing => false,
            KeepFields::Passthrough => PASSTHROUGH_KEYS.contains(&key),
            KeepFields::NonDirective => !DIRECTIVE_KEYS.contains(&key),
        }
    }
}

impl Document {
    /// Render the document for emission.
    ///
    /// Directive keys never survive. When no field is kept the output is the
    /// body alone.
    pub fn render(&self, keep: KeepFields) -> String {
        let kept: serde_yaml::Mapping = self
            .fields
            .iter()
            .filter(|(k, _)| k.as_str().is_some_and(|k| keep.keeps(k)))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        if kept.is_empty() {
            return self.body.clone();
        }

        match serde_yaml::to_string(&kept) {
            Ok(yaml) => format!("---\n{}---\n{}", yaml, self.body),
            Err(_) => self.body.clone(),
        }
    }
}
