// src/search/registry.rs

//! Remote registry file
//!
//! Plain-text file listing the configured remotes in priority order, then a
//! blank line, then which remote each known reference was obtained from:
//!
//! ```text
//! conancenter https://center.conan.io True
//! local http://localhost:9300 False
//!
//! Say/1.1@memsharded/testing local
//! ```
//!
//! Two-column remote lines (`name url`) are accepted and default to
//! verifying SSL.

use crate::error::{Error, Result};
use crate::output::Output;
use crate::reference::PackageReference;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_REMOTES: &str = "conancenter https://center.conan.io True\n";

/// A configured remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: String,
    pub verify_ssl: bool,
}

impl Remote {
    pub fn new(name: impl Into<String>, url: impl Into<String>, verify_ssl: bool) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            verify_ssl,
        }
    }
}

/// Remotes and reference-to-remote records backed by a file
#[derive(Debug, Clone)]
pub struct RemoteRegistry {
    path: PathBuf,
    remotes: Vec<Remote>,
    refs: BTreeMap<String, String>,
}

impl RemoteRegistry {
    /// Load the registry, creating it with the default remote if missing
    pub fn load(path: impl Into<PathBuf>, output: &dyn Output) -> Result<Self> {
        let path = path.into();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                output.warn(&format!(
                    "Remotes registry file missing, creating default one in {}",
                    path.display()
                ));
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, DEFAULT_REMOTES)?;
                DEFAULT_REMOTES.to_string()
            }
            Err(e) => return Err(e.into()),
        };
        Self::parse(path, &contents)
    }

    /// Parse registry contents; `path` is where `save` will write
    pub fn parse(path: impl Into<PathBuf>, contents: &str) -> Result<Self> {
        let path = path.into();
        let mut remotes: Vec<Remote> = Vec::new();
        let mut refs = BTreeMap::new();
        let mut end_remotes = false;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                if end_remotes {
                    return Err(Error::Registry(format!(
                        "Bad file format, blank line {}",
                        path.display()
                    )));
                }
                end_remotes = true;
                continue;
            }

            let chunks: Vec<&str> = line.split_whitespace().collect();
            if !end_remotes {
                let (name, url, verify_ssl) = match chunks.as_slice() {
                    [name, url] => (*name, *url, true),
                    [name, url, verify] => (*name, *url, parse_bool(verify)),
                    _ => {
                        return Err(Error::Registry(format!(
                            "Bad file format, wrong item numbers in line '{}'",
                            line
                        )));
                    }
                };
                if remotes.iter().any(|r| r.name == name) {
                    return Err(Error::Registry(format!("Remote '{}' defined twice", name)));
                }
                remotes.push(Remote::new(name, url, verify_ssl));
            } else {
                let [reference, remote] = chunks.as_slice() else {
                    return Err(Error::Registry(format!(
                        "Bad file format, wrong item numbers in line '{}'",
                        line
                    )));
                };
                refs.insert(reference.to_string(), remote.to_string());
            }
        }

        Ok(Self { path, remotes, refs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the registry back to its file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, self.to_string())?;
        debug!("Saved remote registry to {}", self.path.display());
        Ok(())
    }

    /// Remotes in priority order
    pub fn remotes(&self) -> &[Remote] {
        &self.remotes
    }

    /// First remote in the registry
    pub fn default_remote(&self) -> Result<&Remote> {
        self.remotes
            .first()
            .ok_or_else(|| Error::NoRemoteAvailable(self.path.display().to_string()))
    }

    pub fn remote(&self, name: &str) -> Result<&Remote> {
        self.remotes
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| Error::RemoteNotFound(name.to_string()))
    }

    pub fn add(&mut self, name: &str, url: &str, verify_ssl: bool) -> Result<()> {
        if self.remotes.iter().any(|r| r.name == name) {
            return Err(Error::Registry(format!("Remote '{}' already exists in remotes", name)));
        }
        self.remotes.push(Remote::new(name, url, verify_ssl));
        Ok(())
    }

    pub fn update(&mut self, name: &str, url: &str, verify_ssl: bool) -> Result<()> {
        let remote = self
            .remotes
            .iter_mut()
            .find(|r| r.name == name)
            .ok_or_else(|| Error::RemoteNotFound(name.to_string()))?;
        remote.url = url.to_string();
        remote.verify_ssl = verify_ssl;
        Ok(())
    }

    /// Remove a remote together with the references recorded against it
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let before = self.remotes.len();
        self.remotes.retain(|r| r.name != name);
        if self.remotes.len() == before {
            return Err(Error::RemoteNotFound(name.to_string()));
        }
        self.refs.retain(|_, remote| remote != name);
        Ok(())
    }

    /// Reference -> remote name records
    pub fn refs(&self) -> &BTreeMap<String, String> {
        &self.refs
    }

    /// Remote a reference was obtained from
    pub fn get_ref(&self, reference: &PackageReference) -> Option<&Remote> {
        let name = self.refs.get(&reference.to_string())?;
        self.remotes.iter().find(|r| &r.name == name)
    }

    pub fn set_ref(&mut self, reference: &PackageReference, remote: &str) -> Result<()> {
        self.remote(remote)?;
        self.refs.insert(reference.to_string(), remote.to_string());
        Ok(())
    }

    pub fn remove_ref(&mut self, reference: &PackageReference) -> bool {
        self.refs.remove(&reference.to_string()).is_some()
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "yes" | "y" | "true")
}

impl std::fmt::Display for RemoteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for remote in &self.remotes {
            let verify = if remote.verify_ssl { "True" } else { "False" };
            writeln!(f, "{} {} {}", remote.name, remote.url, verify)?;
        }
        writeln!(f)?;
        for (reference, remote) in &self.refs {
            writeln!(f, "{} {}", reference, remote)?;
        }
        Ok(())
    }
}
