// src/requirement.rs

//! Declared package requirements
//!
//! A requirement is an edge from a package to one of its dependencies. It is
//! declared either pinned (`zlib/1.2.11@conan/stable`) or with a version range
//! (`zlib/[>=1.2,<2.0]@conan/stable`). The declared range is kept for the
//! requirement's whole life, so a reference pinned later by a downstream
//! package can still be checked against it.

use crate::error::Result;
use crate::reference::PackageReference;
use crate::resolver::Resolution;
use std::fmt;

/// A dependency on another package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Current target: the declared reference, a downstream pin, or the resolved version
    pub reference: PackageReference,
    /// Range expression from the declaration, without brackets
    pub version_range: Option<String>,
    declared: PackageReference,
}

impl Requirement {
    /// Create a requirement from its declared reference
    pub fn new(reference: PackageReference) -> Self {
        let version_range = reference.range().map(str::to_string);
        Self {
            declared: reference.clone(),
            reference,
            version_range,
        }
    }

    /// Parse a requirement declaration
    pub fn parse(s: &str) -> Result<Self> {
        Ok(Self::new(PackageReference::parse(s)?))
    }

    /// Package name of the dependency
    pub fn name(&self) -> &str {
        &self.reference.name
    }

    /// Whether the current reference carries a concrete version
    pub fn is_resolved(&self) -> bool {
        self.reference.is_pinned()
    }

    /// Replace the target with a pinned reference coming from downstream
    ///
    /// The declared range is kept; the resolver later checks the pin against it.
    pub fn pin(&mut self, reference: PackageReference) {
        self.reference = reference;
    }

    /// Apply the outcome of a resolution
    pub fn apply(&mut self, resolution: Resolution) {
        if let Resolution::Resolved(reference) = resolution {
            self.reference = reference;
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.declared)
    }
}

/// Requirements of one package, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements {
    items: Vec<Requirement>,
}

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a requirement; one with the same package name is replaced in place
    pub fn add(&mut self, requirement: Requirement) {
        match self.items.iter_mut().find(|r| r.name() == requirement.name()) {
            Some(existing) => *existing = requirement,
            None => self.items.push(requirement),
        }
    }

    /// Parse and add a requirement declaration
    pub fn require(&mut self, declaration: &str) -> Result<()> {
        self.add(Requirement::parse(declaration)?);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Requirement> {
        self.items.iter().find(|r| r.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Requirement> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Requirements {
    type Item = &'a Requirement;
    type IntoIter = std::slice::Iter<'a, Requirement>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_requirement_has_no_range() {
        let req = Requirement::parse("zlib/1.2.11@conan/stable").unwrap();
        assert_eq!(req.version_range, None);
        assert!(req.is_resolved());
    }

    #[test]
    fn test_ranged_requirement() {
        let req = Requirement::parse("Say/[>=1.0,<2.0]@memsharded/testing").unwrap();
        assert_eq!(req.version_range.as_deref(), Some(">=1.0,<2.0"));
        assert!(!req.is_resolved());
        assert_eq!(req.to_string(), "Say/[>=1.0,<2.0]@memsharded/testing");
    }

    #[test]
    fn test_pin_keeps_declared_range() {
        let mut req = Requirement::parse("Say/[~1.1]@memsharded/testing").unwrap();
        req.pin(PackageReference::parse("Say/1.1.2@memsharded/testing").unwrap());
        assert!(req.is_resolved());
        assert_eq!(req.version_range.as_deref(), Some("~1.1"));
        assert_eq!(req.to_string(), "Say/[~1.1]@memsharded/testing");
    }

    #[test]
    fn test_apply_resolution() {
        let mut req = Requirement::parse("Say/[~1.1]@memsharded/testing").unwrap();
        req.apply(Resolution::Unchanged);
        assert!(!req.is_resolved());

        let resolved = PackageReference::parse("Say/1.1.2@memsharded/testing").unwrap();
        req.apply(Resolution::Resolved(resolved.clone()));
        assert_eq!(req.reference, resolved);
    }

    #[test]
    fn test_requirements_replace_by_name() {
        let mut reqs = Requirements::new();
        reqs.require("Say/[~1.1]@memsharded/testing").unwrap();
        reqs.require("Hello/1.2@memsharded/testing").unwrap();
        reqs.require("Say/0.2@memsharded/testing").unwrap();

        assert_eq!(reqs.len(), 2);
        let names: Vec<&str> = reqs.iter().map(Requirement::name).collect();
        assert_eq!(names, vec!["Say", "Hello"]);
        assert_eq!(reqs.get("Say").unwrap().reference.version, "0.2");
    }
}
