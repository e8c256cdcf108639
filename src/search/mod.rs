// src/search/mod.rs

//! Candidate sources for version-range resolution
//!
//! The resolver only needs two capabilities: list the recipes in the local
//! cache matching a pattern, and list the recipes published on remotes
//! matching a pattern. Patterns are globs over the full reference text, e.g.
//! `Say/*@memsharded/testing`.

mod cache;
mod registry;
mod remote;

pub use cache::RecipeCache;
pub use registry::{Remote, RemoteRegistry};
pub use remote::{IndexClient, RemoteClient, RemoteSearcher};

use crate::error::{Error, Result};
use crate::reference::PackageReference;
use glob::{MatchOptions, Pattern};

/// Search over recipes available locally
pub trait LocalSearch {
    fn search_recipes(&self, pattern: &str) -> Result<Vec<PackageReference>>;
}

/// Search over recipes published on remotes
pub trait RemoteSearch {
    fn search_remotes(&self, pattern: &str, ignorecase: bool) -> Result<Vec<PackageReference>>;
}

/// Compiled reference pattern
#[derive(Debug, Clone)]
pub struct ReferencePattern {
    pattern: Pattern,
    options: MatchOptions,
}

impl ReferencePattern {
    pub fn new(pattern: &str, ignorecase: bool) -> Result<Self> {
        let compiled = Pattern::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: compiled,
            options: MatchOptions {
                case_sensitive: !ignorecase,
                require_literal_separator: false,
                require_literal_leading_dot: false,
            },
        })
    }

    pub fn matches(&self, reference: &PackageReference) -> bool {
        self.pattern
            .matches_with(&reference.to_string(), self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_case_sensitivity() {
        let foo = PackageReference::parse("Foo/2.0@user/channel").unwrap();

        let exact = ReferencePattern::new("foo/*@user/channel", false).unwrap();
        assert!(!exact.matches(&foo));

        let loose = ReferencePattern::new("foo/*@user/channel", true).unwrap();
        assert!(loose.matches(&foo));
    }

    #[test]
    fn test_pattern_requires_same_user_channel() {
        let pattern = ReferencePattern::new("Say/*@memsharded/testing", false).unwrap();
        assert!(pattern.matches(&PackageReference::parse("Say/0.1@memsharded/testing").unwrap()));
        assert!(!pattern.matches(&PackageReference::parse("Say/0.1@memsharded/stable").unwrap()));
        assert!(!pattern.matches(&PackageReference::parse("Sayer/0.1@memsharded/testing").unwrap()));
    }
}
