//! Implementation of the `squash servers` command.

use super::engine;
use crate::cli::ServersArgs;
use crate::context::ProjectContext;
use crate::error::Result;
use crate::remote::{GhCliFetcher, OfflineFetcher, RemoteFetcher};

/// Execute the `squash servers` command.
pub fn cmd_servers(ctx: &ProjectContext, args: ServersArgs) -> Result<()> {
    let online = GhCliFetcher::new();
    let offline = OfflineFetcher;
    let fetcher: &dyn RemoteFetcher = if args.offline { &offline } else { &online };

    for name in servers_with(ctx, &args.recipe, fetcher)? {
        println!("{}", name);
    }
    Ok(())
}

pub(crate) fn servers_with(
    ctx: &ProjectContext,
    recipe: &str,
    fetcher: &dyn RemoteFetcher,
) -> Result<Vec<String>> {
    let config = ctx.load_config()?;
    let mut engine = engine(ctx, &config, fetcher);
    Ok(engine.mcp_servers(recipe)?.into_iter().collect())
}
