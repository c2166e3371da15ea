//! Recipe, source, and server definition types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named bundle specification.
///
/// In YAML a recipe is either a full mapping or, for agent-only recipes, a
/// bare list of files:
///
/// ```yaml
/// recipes:
///   core:
///     description: Everyday rules
///     files: [rules/style.md, rules/testing]
///     subagents:
///       - { name: reviewer, recipe: review }
///   review: [rules/review.md]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecipeDef")]
pub struct Recipe {
    pub description: String,
    pub files: Vec<String>,
    pub sources: Vec<SourceSpec>,
    /// Flat URL list kept for configs written before `sources:` existed.
    pub remote_sources: Vec<String>,
    pub subagents: Vec<SubagentEntry>,
    pub mcp_servers: Vec<String>,
    pub omit_command_prefix: bool,
    pub model: Option<String>,
}

impl Recipe {
    /// Build a files-only recipe.
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn subagent_names(&self) -> Vec<String> {
        self.subagents.iter().map(|s| s.name.clone()).collect()
    }

    pub fn subagent(&self, name: &str) -> Option<&SubagentEntry> {
        self.subagents.iter().find(|s| s.name == name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecipeDef {
    Files(Vec<String>),
    Full(RecipeFields),
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RecipeFields {
    description: String,
    files: Vec<String>,
    sources: Vec<SourceSpec>,
    remote_sources: Vec<String>,
    subagents: Vec<SubagentEntry>,
    mcp_servers: Vec<String>,
    omit_command_prefix: bool,
    model: Option<String>,
}

impl From<RecipeDef> for Recipe {
    fn from(def: RecipeDef) -> Self {
        match def {
            RecipeDef::Files(files) => Recipe::with_files(files),
            RecipeDef::Full(f) => Recipe {
                description: f.description,
                files: f.files,
                sources: f.sources,
                remote_sources: f.remote_sources,
                subagents: f.subagents,
                mcp_servers: f.mcp_servers,
                omit_command_prefix: f.omit_command_prefix,
                model: f.model,
            },
        }
    }
}

/// A subagent registered by a recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubagentEntry {
    /// Name other files use in `dispatches:`.
    pub name: String,
    /// Recipe that backs this subagent.
    pub recipe: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// One `sources:` entry.
///
/// A bare string is classified by shape: URLs are remote, anything else is
/// a local file or directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSourceSpec")]
pub enum SourceSpec {
    /// An explicit local file.
    File(String),
    /// A local file or directory.
    Local(String),
    /// A URL.
    Remote(String),
    /// Rules taken from a GitHub repository.
    Github(GithubSource),
}

/// A `{github, branch, rules}` source entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubSource {
    /// `owner/repo`.
    pub github: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Repository paths. Entries with an extension are files, others are
    /// directories.
    #[serde(default)]
    pub rules: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSourceSpec {
    Text(String),
    Github(GithubSource),
    File { file: String },
    Local { local: String },
    Remote { remote: String },
}

impl From<RawSourceSpec> for SourceSpec {
    fn from(raw: RawSourceSpec) -> Self {
        match raw {
            RawSourceSpec::Text(s) if crate::source::is_url(&s) => SourceSpec::Remote(s),
            RawSourceSpec::Text(s) => SourceSpec::Local(s),
            RawSourceSpec::Github(g) => SourceSpec::Github(g),
            RawSourceSpec::File { file } => SourceSpec::File(file),
            RawSourceSpec::Local { local } => SourceSpec::Local(local),
            RawSourceSpec::Remote { remote } => SourceSpec::Remote(remote),
        }
    }
}

/// Output naming settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File name of the combined document.
    #[serde(default = "default_combined")]
    pub combined: String,

    /// Keep non-directive frontmatter fields on emitted content.
    #[serde(default)]
    pub preserve_frontmatter: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            combined: default_combined(),
            preserve_frontmatter: false,
        }
    }
}

/// How to launch or reach an MCP server.
///
/// Written verbatim into the server manifest. A `command` given as one
/// string with no `args` is split shell-style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerDefinition {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl ServerDefinition {
    /// Split a single-string `command` into program and arguments.
    pub fn normalized(&self) -> Result<Self, String> {
        let mut out = self.clone();
        if let Some(command) = &self.command
            && self.args.is_empty()
            && command.contains(char::is_whitespace)
        {
            let mut words = shell_words::split(command)
                .map_err(|e| format!("invalid command '{}': {}", command, e))?;
            if !words.is_empty() {
                out.command = Some(words.remove(0));
                out.args = words;
            }
        }
        Ok(out)
    }
}

pub(crate) fn default_rules_dir() -> String {
    "rules".to_string()
}

pub(crate) fn default_combined() -> String {
    "CLAUDE.md".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}
