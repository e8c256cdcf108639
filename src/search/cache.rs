// src/search/cache.rs

//! Local recipe cache
//!
//! Exported recipes live under `<root>/<name>/<version>/<user>/<channel>/`.
//! Searching walks exactly four levels below the root and matches each
//! reference against the pattern, case-sensitively.

use super::{LocalSearch, ReferencePattern};
use crate::error::{Error, Result};
use crate::reference::PackageReference;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const REFERENCE_DEPTH: usize = 4;

/// On-disk cache of exported recipes
#[derive(Debug, Clone)]
pub struct RecipeCache {
    root: PathBuf,
}

impl RecipeCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one recipe
    pub fn recipe_dir(&self, reference: &PackageReference) -> PathBuf {
        self.root
            .join(&reference.name)
            .join(&reference.version)
            .join(&reference.user)
            .join(&reference.channel)
    }

    /// Register a pinned recipe in the cache
    pub fn export(&self, reference: &PackageReference) -> Result<PathBuf> {
        if !reference.is_pinned() {
            return Err(Error::InvalidReference {
                reference: reference.to_string(),
                reason: "cannot export a version range".to_string(),
            });
        }
        let dir = self.recipe_dir(reference);
        fs::create_dir_all(&dir)?;
        debug!("Exported {} to {}", reference, dir.display());
        Ok(dir)
    }

    pub fn contains(&self, reference: &PackageReference) -> bool {
        self.recipe_dir(reference).is_dir()
    }

    /// Remove a recipe; empty parent directories are left in place
    pub fn remove(&self, reference: &PackageReference) -> Result<()> {
        let dir = self.recipe_dir(reference);
        if dir.is_dir() {
            fs::remove_dir_all(&dir)?;
        }
        Ok(())
    }

    /// Every recipe in the cache, sorted
    pub fn list(&self) -> Result<Vec<PackageReference>> {
        self.collect(|_| true)
    }

    fn collect(&self, keep: impl Fn(&PackageReference) -> bool) -> Result<Vec<PackageReference>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(REFERENCE_DEPTH)
            .max_depth(REFERENCE_DEPTH);
        for entry in walker {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            if !entry.file_type().is_dir() {
                continue;
            }
            match self.reference_for(entry.path()) {
                Some(reference) if keep(&reference) => found.push(reference),
                Some(_) => {}
                None => debug!("Ignoring cache entry {}", entry.path().display()),
            }
        }
        found.sort();
        Ok(found)
    }

    fn reference_for(&self, path: &Path) -> Option<PackageReference> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<&str> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        let [name, version, user, channel] = parts.as_slice() else {
            return None;
        };
        PackageReference::parse(&format!("{}/{}@{}/{}", name, version, user, channel)).ok()
    }
}

impl LocalSearch for RecipeCache {
    fn search_recipes(&self, pattern: &str) -> Result<Vec<PackageReference>> {
        let pattern = ReferencePattern::new(pattern, false)?;
        let found = self.collect(|r| pattern.matches(r))?;
        debug!("Local cache matched {} recipes", found.len());
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(s: &str) -> PackageReference {
        PackageReference::parse(s).unwrap()
    }

    #[test]
    fn test_export_and_search() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RecipeCache::new(dir.path());
        for v in ["0.1", "1.1", "2.2.1"] {
            cache.export(&r(&format!("Say/{}@memsharded/testing", v))).unwrap();
        }
        cache.export(&r("Say/9.9@other/stable")).unwrap();
        cache.export(&r("Hello/1.2@memsharded/testing")).unwrap();

        let found = cache.search_recipes("Say/*@memsharded/testing").unwrap();
        let versions: Vec<&str> = found.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["0.1", "1.1", "2.2.1"]);
        assert_eq!(cache.list().unwrap().len(), 5);
    }

    #[test]
    fn test_search_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RecipeCache::new(dir.path());
        cache.export(&r("Say/1.0@memsharded/testing")).unwrap();

        assert!(cache.search_recipes("say/*@memsharded/testing").unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RecipeCache::new(dir.path().join("nope"));
        assert!(cache.search_recipes("*").unwrap().is_empty());
    }

    #[test]
    fn test_export_rejects_range() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RecipeCache::new(dir.path());
        assert!(cache.export(&r("Say/[>1.0]@memsharded/testing")).is_err());
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RecipeCache::new(dir.path());
        let say = r("Say/1.0@memsharded/testing");
        cache.export(&say).unwrap();
        assert!(cache.contains(&say));
        cache.remove(&say).unwrap();
        assert!(!cache.contains(&say));
        assert!(cache.list().unwrap().is_empty());
    }
}
