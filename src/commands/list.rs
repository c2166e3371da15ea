//! Implementation of the `squash list` command.

use crate::config::Config;
use crate::context::ProjectContext;
use crate::error::Result;

/// Execute the `squash list` command.
pub fn cmd_list(ctx: &ProjectContext) -> Result<()> {
    let config = ctx.load_config()?;
    print!("{}", render_list(&config));
    Ok(())
}

/// One line per recipe: name, description, and subagents.
pub fn render_list(config: &Config) -> String {
    if config.recipes.is_empty() {
        return "No recipes configured.\n".to_string();
    }

    let width = config.recipes.keys().map(String::len).max().unwrap_or(0);
    let mut out = String::new();
    for (name, recipe) in &config.recipes {
        let mut line = format!("{:<width$}", name, width = width);
        if !recipe.description.is_empty() {
            line.push_str("  ");
            line.push_str(&recipe.description);
        }
        let subagents = recipe.subagent_names();
        if !subagents.is_empty() {
            line.push_str(&format!("  [subagents: {}]", subagents.join(", ")));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
