//! Rendering a recipe tree into an artifact plan.

use super::{ArtifactPlan, PlanOptions};
use crate::config::ServerDefinition;
use crate::error::{Result, SquashError};
use crate::frontmatter::KeepFields;
use crate::mcp::McpConfig;
use crate::resolver::{Classification, ProcessedSource, Resolution, after_dir};
use crate::subagent::{RecipeTree, SubagentUnit, display_name};
use crate::warning::Warning;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Render `tree` into every file it produces. Touches nothing on disk.
///
/// `servers` holds the server definitions from config; required names
/// without one are reported as warnings.
pub fn plan(
    tree: &RecipeTree,
    options: &PlanOptions,
    servers: &BTreeMap<String, ServerDefinition>,
) -> Result<ArtifactPlan> {
    let mut out = ArtifactPlan::default();

    let combined = combine(&tree.resolution, options);
    if !combined.is_empty() {
        out.add(options.combined.as_str(), combined, false);
    }

    for processed in tree.resolution.of_class(Classification::Command) {
        let Some(rest) = after_dir(&processed.segments, "commands") else {
            continue;
        };
        let key = rest.join("/");
        let path = if tree.recipe.omit_command_prefix {
            format!("commands/{}", key)
        } else {
            format!("commands/{}/{}", tree.name, key)
        };
        out.add(path, processed.document.render(standalone(options)), false);
    }

    add_shared(&tree.resolution, options, &mut out);

    for unit in &tree.subagents {
        for processed in unit.resolution.of_class(Classification::Command) {
            out.warnings.push(Warning::SubagentCommandIgnored {
                subagent: unit.name().to_string(),
                file: display_name(processed),
            });
        }
        add_shared(&unit.resolution, options, &mut out);
        out.add(
            format!("agents/{}.md", unit.name()),
            agent_definition(unit, options)?,
            false,
        );
    }

    let (manifest, mut warnings) = McpConfig::from_names(&tree.servers, servers);
    out.warnings.append(&mut warnings);
    if !manifest.is_empty() {
        out.add(".mcp.json", manifest.to_json()?, false);
    }

    tracing::info!(
        recipe = tree.name.as_str(),
        artifacts = out.len(),
        subagents = tree.subagents.len(),
        "planned artifacts"
    );
    Ok(out)
}

/// Field policy for commands and skills.
fn standalone(options: &PlanOptions) -> KeepFields {
    if options.preserve_frontmatter {
        KeepFields::NonDirective
    } else {
        KeepFields::Passthrough
    }
}

/// Content sources joined by blank lines, newline-terminated. Empty when
/// nothing qualifies.
fn combine(resolution: &Resolution, options: &PlanOptions) -> String {
    let keep = if options.preserve_frontmatter {
        KeepFields::NonDirective
    } else {
        KeepFields::Nothing
    };

    let parts: Vec<String> = resolution
        .of_class(Classification::Content)
        .filter(|p| !options.essential_only || p.directives().essential)
        .map(|p| {
            p.document
                .render(keep)
                .trim_start_matches(['\r', '\n'])
                .trim_end()
                .to_string()
        })
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        String::new()
    } else {
        format!("{}\n", parts.join("\n\n"))
    }
}

/// Skills, bin scripts, and `scripts:` files. Shared between the owner and
/// its subagents; the first writer of a path wins.
fn add_shared(resolution: &Resolution, options: &PlanOptions, out: &mut ArtifactPlan) {
    for processed in resolution.of_class(Classification::Skill) {
        if let Some((_, path)) = skill_location(processed) {
            out.add(path, processed.document.render(standalone(options)), false);
        }
    }

    for processed in resolution.of_class(Classification::Bin) {
        if let Some(rest) = after_dir(&processed.segments, "bin") {
            out.add(
                format!("bin/{}", rest.join("/")),
                processed.original_content.clone(),
                true,
            );
        }
    }

    for processed in &resolution.processed {
        for script in &processed.scripts {
            if let Some(name) = script.identity.file_name() {
                out.add(format!("bin/{}", name), script.content.clone(), true);
            }
        }
    }
}

/// Skill name and output path for a skill source.
///
/// `skills/<name>/<rest>` keeps its layout; a file directly inside `skills/`
/// becomes `skills/<stem>/SKILL.md`.
fn skill_location(processed: &ProcessedSource) -> Option<(String, String)> {
    let rest = after_dir(&processed.segments, "skills")?;
    match rest {
        [file] => {
            let stem = Path::new(file)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())?;
            let path = format!("skills/{}/SKILL.md", stem);
            Some((stem, path))
        }
        [name, ..] => Some((name.clone(), format!("skills/{}", rest.join("/")))),
        [] => None,
    }
}

#[derive(Serialize)]
struct AgentHeader {
    name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skills: Vec<String>,
    #[serde(rename = "mcpServers", skip_serializing_if = "Vec::is_empty")]
    mcp_servers: Vec<String>,
}

fn agent_definition(unit: &SubagentUnit, options: &PlanOptions) -> Result<String> {
    let mut skills: Vec<String> = Vec::new();
    for processed in unit.resolution.of_class(Classification::Skill) {
        if let Some((name, _)) = skill_location(processed)
            && !skills.contains(&name)
        {
            skills.push(name);
        }
    }

    let header = AgentHeader {
        name: unit.name().to_string(),
        description: unit.recipe.description.clone(),
        model: unit.model().map(str::to_string),
        skills,
        mcp_servers: unit.servers.iter().cloned().collect(),
    };
    let yaml = serde_yaml::to_string(&header).map_err(|e| {
        SquashError::WriteError(format!(
            "failed to render agent '{}': {}",
            unit.name(),
            e
        ))
    })?;

    let body = combine(&unit.resolution, options);
    if body.is_empty() {
        Ok(format!("---\n{}---\n", yaml))
    } else {
        Ok(format!("---\n{}---\n\n{}", yaml, body))
    }
}
