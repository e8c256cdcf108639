// src/commands/remote.rs
//! Remote registry commands

use super::Context;
use anyhow::Result;
use tracing::info;

/// List remotes in priority order
pub fn cmd_remote_list(ctx: &Context) -> Result<()> {
    let registry = ctx.registry()?;
    if registry.remotes().is_empty() {
        println!("No remotes configured");
        return Ok(());
    }
    for remote in registry.remotes() {
        let verify = if remote.verify_ssl { "" } else { " [insecure]" };
        println!("{}: {}{}", remote.name, remote.url, verify);
    }
    Ok(())
}

/// Add a remote
pub fn cmd_remote_add(ctx: &Context, name: &str, url: &str, insecure: bool) -> Result<()> {
    info!("Adding remote: {} ({})", name, url);
    let mut registry = ctx.registry()?;
    registry.add(name, url, !insecure)?;
    registry.save()?;
    println!("Added remote: {}", name);
    Ok(())
}

/// Remove a remote
pub fn cmd_remote_remove(ctx: &Context, name: &str) -> Result<()> {
    info!("Removing remote: {}", name);
    let mut registry = ctx.registry()?;
    registry.remove(name)?;
    registry.save()?;
    println!("Removed remote: {}", name);
    Ok(())
}
