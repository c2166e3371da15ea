//! Typed directive bag read from a document's frontmatter.

use serde::{Deserialize, Deserializer};

/// Directives recognized in rule document frontmatter.
///
/// List-valued directives accept either a single string or a list of
/// strings. Unknown keys are ignored here; they live on in
/// [`super::Document::fields`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Directives {
    /// Best-effort dependencies, resolved relative to the declaring file.
    #[serde(deserialize_with = "one_or_many")]
    pub requires: Vec<String>,

    /// Validated dependencies that must live under a `skills` directory.
    #[serde(deserialize_with = "one_or_many")]
    pub skills: Vec<String>,

    /// Subagent names this document routes work to.
    #[serde(deserialize_with = "one_or_many")]
    pub dispatches: Vec<String>,

    /// External services this document needs registered.
    #[serde(deserialize_with = "one_or_many")]
    pub mcp_servers: Vec<String>,

    /// Whether this document survives an essential-only build.
    pub essential: bool,

    /// Recipe names this document opts into without being listed.
    #[serde(deserialize_with = "one_or_many")]
    pub recipes: Vec<String>,

    /// Helper scripts to ship alongside this document.
    pub scripts: ScriptsDirective,
}

/// The `scripts:` directive.
///
/// Either `{files: [...], remote: [...]}` or a bare list of local files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawScripts")]
pub struct ScriptsDirective {
    /// Local script paths, relative to the declaring document.
    pub files: Vec<String>,
    /// Script URLs.
    pub remote: Vec<String>,
}

impl ScriptsDirective {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.remote.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScripts {
    List(Vec<String>),
    Table {
        #[serde(default)]
        files: Vec<String>,
        #[serde(default)]
        remote: Vec<String>,
    },
}

impl From<RawScripts> for ScriptsDirective {
    fn from(raw: RawScripts) -> Self {
        match raw {
            RawScripts::List(files) => Self {
                files,
                remote: Vec::new(),
            },
            RawScripts::Table { files, remote } => Self { files, remote },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accept `key: value`, `key: [a, b]`, or `key: null`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}
