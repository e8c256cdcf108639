// src/search/remote.rs

//! Searching recipes across remotes
//!
//! `RemoteSearcher` walks the registry's remotes in priority order and
//! returns the first non-empty result. Talking to a remote is delegated to a
//! `RemoteClient`; `IndexClient` serves searches from a JSON snapshot of
//! remote indices:
//!
//! ```json
//! {
//!   "conancenter": ["zlib/1.2.11@conan/stable", "zlib/1.2.13@conan/stable"],
//!   "local": ["Say/1.1@memsharded/testing"]
//! }
//! ```

use super::{ReferencePattern, Remote, RemoteRegistry, RemoteSearch};
use crate::error::Result;
use crate::reference::PackageReference;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Access to the recipe listing of one remote
pub trait RemoteClient {
    fn search(&self, remote: &Remote, pattern: &str, ignorecase: bool) -> Result<Vec<PackageReference>>;
}

/// Remote indices loaded from a snapshot file
#[derive(Debug, Clone, Default)]
pub struct IndexClient {
    indices: BTreeMap<String, Vec<PackageReference>>,
}

impl IndexClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot; a missing file yields empty indices
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No remote index at {}", path.display());
            return Ok(Self::new());
        }
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(contents)?;
        let mut client = Self::new();
        for (remote, references) in raw {
            for reference in references {
                client.publish(&remote, PackageReference::parse(&reference)?);
            }
        }
        Ok(client)
    }

    /// Add a reference to a remote's index
    pub fn publish(&mut self, remote: &str, reference: PackageReference) {
        let index = self.indices.entry(remote.to_string()).or_default();
        if !index.contains(&reference) {
            index.push(reference);
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let raw: BTreeMap<&str, Vec<String>> = self
            .indices
            .iter()
            .map(|(remote, refs)| (remote.as_str(), refs.iter().map(|r| r.to_string()).collect()))
            .collect();
        Ok(serde_json::to_string_pretty(&raw)?)
    }
}

impl RemoteClient for IndexClient {
    fn search(&self, remote: &Remote, pattern: &str, ignorecase: bool) -> Result<Vec<PackageReference>> {
        let pattern = ReferencePattern::new(pattern, ignorecase)?;
        let mut found: Vec<PackageReference> = self
            .indices
            .get(&remote.name)
            .map(|refs| refs.iter().filter(|r| pattern.matches(r)).cloned().collect())
            .unwrap_or_default();
        found.sort();
        Ok(found)
    }
}

/// `RemoteSearch` over every remote of a registry
pub struct RemoteSearcher<'a, C: RemoteClient> {
    registry: &'a RemoteRegistry,
    client: &'a C,
    remote_name: Option<String>,
}

impl<'a, C: RemoteClient> RemoteSearcher<'a, C> {
    pub fn new(registry: &'a RemoteRegistry, client: &'a C) -> Self {
        Self {
            registry,
            client,
            remote_name: None,
        }
    }

    /// Restrict searches to a single remote
    pub fn with_remote(mut self, name: impl Into<String>) -> Self {
        self.remote_name = Some(name.into());
        self
    }
}

impl<C: RemoteClient> RemoteSearch for RemoteSearcher<'_, C> {
    fn search_remotes(&self, pattern: &str, ignorecase: bool) -> Result<Vec<PackageReference>> {
        if let Some(name) = &self.remote_name {
            let remote = self.registry.remote(name)?;
            return self.client.search(remote, pattern, ignorecase);
        }

        for remote in self.registry.remotes() {
            let found = self.client.search(remote, pattern, ignorecase)?;
            if !found.is_empty() {
                debug!("Remote '{}' matched {} recipes for {}", remote.name, found.len(), pattern);
                return Ok(found);
            }
        }
        if self.registry.remotes().is_empty() {
            warn!("No remotes defined in {}", self.registry.path().display());
        }
        Ok(Vec::new())
    }
}
