// src/commands/mod.rs
//! Command handlers for the depresolve CLI

mod remote;
mod resolve;
mod search;

pub use remote::{cmd_remote_add, cmd_remote_list, cmd_remote_remove};
pub use resolve::{cmd_resolve, cmd_satisfy};
pub use search::{cmd_export, cmd_search};

use anyhow::{Context as _, Result};
use depresolve::config::{self, Config};
use depresolve::{IndexClient, RecipeCache, RemoteRegistry, TracingOutput};
use std::path::Path;
use tracing::debug;

/// Loaded configuration shared by every command
pub struct Context {
    pub config: Config,
}

impl Context {
    /// Load the config file, falling back to `<home>/config.toml`
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let home = config::default_home();
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config::config_path(&home));
        debug!("Using config {}", path.display());

        let config = Config::load(&path, &home)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?;
        Ok(Self { config })
    }

    pub fn cache(&self) -> RecipeCache {
        RecipeCache::new(self.config.cache_dir())
    }

    pub fn registry(&self) -> Result<RemoteRegistry> {
        let path = self.config.registry_path();
        RemoteRegistry::load(&path, &TracingOutput)
            .with_context(|| format!("Failed to load remote registry: {}", path.display()))
    }

    pub fn index(&self) -> Result<IndexClient> {
        let path = self.config.index_path();
        IndexClient::load(&path).with_context(|| format!("Failed to load remote index: {}", path.display()))
    }

    /// Remote restriction: the command-line flag wins over the config file
    pub fn remote<'a>(&'a self, flag: Option<&'a str>) -> Option<&'a str> {
        flag.or(self.config.resolver.remote.as_deref())
    }
}
