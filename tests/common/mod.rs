// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use depresolve::{PackageReference, RecipeCache, RemoteSearch, Result};
use std::cell::RefCell;
use tempfile::TempDir;

/// Versions of `Say` available in the fixtures.
pub const SAY_VERSIONS: &[&str] = &["0.1", "0.2", "0.3", "1.1", "1.1.2", "1.2.1", "2.1", "2.2.1"];

pub fn reference(s: &str) -> PackageReference {
    PackageReference::parse(s).unwrap()
}

/// `Say/<v>@memsharded/testing` for every fixture version.
pub fn say_references() -> Vec<PackageReference> {
    SAY_VERSIONS
        .iter()
        .map(|v| reference(&format!("Say/{}@memsharded/testing", v)))
        .collect()
}

/// Create a recipe cache holding the given references.
///
/// Returns (TempDir, cache) - keep the TempDir alive to prevent cleanup.
pub fn cache_with(references: &[PackageReference]) -> (TempDir, RecipeCache) {
    let temp_dir = tempfile::tempdir().unwrap();
    let cache = RecipeCache::new(temp_dir.path().join("data"));
    for r in references {
        cache.export(r).unwrap();
    }
    (temp_dir, cache)
}

/// Remote search returning a fixed list whatever the pattern, recording calls.
#[derive(Default)]
pub struct MockRemote {
    pub packages: Vec<PackageReference>,
    pub calls: RefCell<Vec<(String, bool)>>,
}

impl MockRemote {
    pub fn new(packages: Vec<PackageReference>) -> Self {
        Self {
            packages,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl RemoteSearch for MockRemote {
    fn search_remotes(&self, pattern: &str, ignorecase: bool) -> Result<Vec<PackageReference>> {
        self.calls.borrow_mut().push((pattern.to_string(), ignorecase));
        Ok(self.packages.clone())
    }
}
