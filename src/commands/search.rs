// src/commands/search.rs
//! Recipe search and export commands

use super::Context;
use anyhow::{Context as _, Result};
use depresolve::{LocalSearch, PackageReference, RemoteSearch, RemoteSearcher};
use tracing::info;

/// Search the local cache, or the remotes with `--remotes`
pub fn cmd_search(
    ctx: &Context,
    pattern: &str,
    remotes: bool,
    ignore_case: bool,
    remote: Option<&str>,
) -> Result<()> {
    let found = if remotes || remote.is_some() {
        let registry = ctx.registry()?;
        let index = ctx.index()?;
        let mut searcher = RemoteSearcher::new(&registry, &index);
        if let Some(name) = ctx.remote(remote) {
            searcher = searcher.with_remote(name);
        }
        searcher.search_remotes(pattern, ignore_case)?
    } else {
        ctx.cache().search_recipes(pattern)?
    };

    if found.is_empty() {
        println!("No recipes matching '{}'", pattern);
    } else {
        for reference in found {
            println!("{}", reference);
        }
    }
    Ok(())
}

/// Register a pinned recipe in the local cache
pub fn cmd_export(ctx: &Context, reference: &str) -> Result<()> {
    let reference = PackageReference::parse(reference)
        .with_context(|| format!("Invalid reference: {}", reference))?;
    let dir = ctx.cache().export(&reference)?;
    info!("Exported {} to {}", reference, dir.display());
    println!("Exported {}", reference);
    Ok(())
}
