// src/config.rs

//! Configuration for the depresolve tool
//!
//! Loaded from `<home>/config.toml`, where the home is `$DEPRESOLVE_HOME`
//! or `~/.depresolve`. Every field is optional:
//!
//! ```toml
//! [resolver]
//! update = false
//! remote = "conancenter"
//!
//! [paths]
//! cache = "/home/me/.depresolve/data"
//! registry = "/home/me/.depresolve/registry.txt"
//! index = "/home/me/.depresolve/index.json"
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the home directory
pub const HOME_ENV: &str = "DEPRESOLVE_HOME";

const HOME_DIR_NAME: &str = ".depresolve";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverSection,

    #[serde(default)]
    pub paths: PathsSection,

    /// Directory the relative defaults hang off; not read from the file
    #[serde(skip)]
    home: PathBuf,
}

/// `[resolver]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverSection {
    /// Prefer remotes over the local cache
    #[serde(default)]
    pub update: bool,

    /// Restrict remote searches to this remote
    #[serde(default)]
    pub remote: Option<String>,
}

/// `[paths]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    /// Local recipe cache root
    #[serde(default)]
    pub cache: Option<PathBuf>,

    /// Remote registry file
    #[serde(default)]
    pub registry: Option<PathBuf>,

    /// Remote index snapshot
    #[serde(default)]
    pub index: Option<PathBuf>,
}

impl Config {
    /// Defaults rooted at `home`
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file; a missing file gives defaults
    pub fn load(path: &Path, home: impl Into<PathBuf>) -> Result<Self> {
        let home = home.into();
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::new(home));
        }
        let content = fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.home = home;
        Ok(config)
    }

    /// Parse configuration text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Home directory the defaults are relative to
    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.paths
            .cache
            .clone()
            .unwrap_or_else(|| self.home.join("data"))
    }

    pub fn registry_path(&self) -> PathBuf {
        self.paths
            .registry
            .clone()
            .unwrap_or_else(|| self.home.join("registry.txt"))
    }

    pub fn index_path(&self) -> PathBuf {
        self.paths
            .index
            .clone()
            .unwrap_or_else(|| self.home.join("index.json"))
    }
}

/// Resolve the home directory
///
/// `override_dir` is the value of `$DEPRESOLVE_HOME`, if any.
pub fn home_from(override_dir: Option<String>) -> PathBuf {
    match override_dir.filter(|d| !d.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(HOME_DIR_NAME),
    }
}

/// Home directory from the environment
pub fn default_home() -> PathBuf {
    home_from(std::env::var(HOME_ENV).ok())
}

/// Config file inside a home directory
pub fn config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE)
}
