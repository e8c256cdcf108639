// src/commands/resolve.rs
//! Range resolution commands

use super::Context;
use anyhow::{Context as _, Result};
use depresolve::{
    satisfying, PackageReference, RemoteSearcher, RequireResolver, Requirement, Resolution,
    TracingOutput,
};
use tracing::info;

/// Resolve one ranged requirement and print the reference it resolves to
pub fn cmd_resolve(
    ctx: &Context,
    requirement: &str,
    by: &str,
    pin: Option<&str>,
    update: Option<bool>,
    remote: Option<&str>,
) -> Result<()> {
    let mut requirement = Requirement::parse(requirement)
        .with_context(|| format!("Invalid requirement: {}", requirement))?;
    let dependent =
        PackageReference::parse(by).with_context(|| format!("Invalid dependent reference: {}", by))?;
    if let Some(pin) = pin {
        let pinned =
            PackageReference::parse(pin).with_context(|| format!("Invalid pinned reference: {}", pin))?;
        if pinned.name != requirement.name() {
            anyhow::bail!(
                "Pinned reference '{}' is not the package required by '{}'",
                pinned,
                requirement
            );
        }
        requirement.pin(pinned);
    }

    let update = update.unwrap_or(ctx.config.resolver.update);
    info!("Resolving {} for {} (update: {})", requirement, dependent, update);

    let cache = ctx.cache();
    let registry = ctx.registry()?;
    let index = ctx.index()?;
    let mut searcher = RemoteSearcher::new(&registry, &index);
    if let Some(name) = ctx.remote(remote) {
        searcher = searcher.with_remote(name);
    }

    let output = TracingOutput;
    let resolver = RequireResolver::new(&output, Some(&cache), &searcher, update);
    let resolution = resolver.resolve(&requirement, &dependent)?;
    if resolution == Resolution::Unchanged {
        info!("{} left unchanged", requirement);
    }
    requirement.apply(resolution);
    println!("{}", requirement.reference);
    Ok(())
}

/// Print the highest version inside a range
pub fn cmd_satisfy(range: &str, versions: &[String]) -> Result<()> {
    match satisfying(versions, range, &TracingOutput)? {
        Some(best) => println!("{}", best),
        None => println!("No version satisfies '{}'", range),
    }
    Ok(())
}
