// src/resolver.rs

//! Version-range requirement resolution
//!
//! `RequireResolver` turns a requirement declared with a version range into a
//! pinned reference. Candidates come from an ordered list of sources fixed at
//! construction: the local recipe cache first, then the remotes; in update
//! mode the remotes are asked first so refreshed indices win.
//!
//! The first source whose candidates contain a version inside the range
//! decides the result. A source with no candidates, or with candidates that
//! all fall outside the range, passes the search on to the next one.
//!
//! A requirement that a downstream package already pinned is never
//! re-resolved: the pin is checked against the range and either accepted as
//! is or reported as a conflict.

use crate::error::{Error, Result};
use crate::output::Output;
use crate::reference::PackageReference;
use crate::requirement::{Requirement, Requirements};
use crate::search::{LocalSearch, RemoteSearch};
use crate::version::satisfying;
use tracing::debug;

/// Outcome of resolving one requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing to change: no range, or a downstream pin inside the range
    Unchanged,
    /// The range resolved to this pinned reference
    Resolved(PackageReference),
}

/// Precedence between the local cache and the remotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOrder {
    #[default]
    LocalFirst,
    RemoteFirst,
}

impl SearchOrder {
    /// Update mode prefers the remotes
    pub fn from_update(update: bool) -> Self {
        if update {
            SearchOrder::RemoteFirst
        } else {
            SearchOrder::LocalFirst
        }
    }
}

/// A place to look for candidate references
pub trait CandidateSource {
    /// Short name used in log lines
    fn label(&self) -> &str;

    fn candidates(&self, pattern: &str) -> Result<Vec<PackageReference>>;
}

struct LocalSource<'a>(&'a dyn LocalSearch);

impl CandidateSource for LocalSource<'_> {
    fn label(&self) -> &str {
        "local cache"
    }

    fn candidates(&self, pattern: &str) -> Result<Vec<PackageReference>> {
        self.0.search_recipes(pattern)
    }
}

struct RemoteSource<'a>(&'a dyn RemoteSearch);

impl CandidateSource for RemoteSource<'_> {
    fn label(&self) -> &str {
        "remotes"
    }

    fn candidates(&self, pattern: &str) -> Result<Vec<PackageReference>> {
        // Exact case: a range must not resolve to a differently-cased package
        self.0.search_remotes(pattern, false)
    }
}

/// Resolves version ranges of requirements against candidate sources
pub struct RequireResolver<'a> {
    output: &'a dyn Output,
    sources: Vec<Box<dyn CandidateSource + 'a>>,
}

impl<'a> RequireResolver<'a> {
    /// Create a resolver over a local cache (optional) and the remotes
    pub fn new(
        output: &'a dyn Output,
        local: Option<&'a dyn LocalSearch>,
        remote: &'a dyn RemoteSearch,
        update: bool,
    ) -> Self {
        let local: Option<Box<dyn CandidateSource + 'a>> =
            local.map(|l| Box::new(LocalSource(l)) as Box<dyn CandidateSource + 'a>);
        let remote: Box<dyn CandidateSource + 'a> = Box::new(RemoteSource(remote));

        let sources: Vec<Box<dyn CandidateSource + 'a>> = match SearchOrder::from_update(update) {
            SearchOrder::LocalFirst => local.into_iter().chain(Some(remote)).collect(),
            SearchOrder::RemoteFirst => Some(remote).into_iter().chain(local).collect(),
        };
        Self::with_sources(output, sources)
    }

    /// Create a resolver over explicit sources, queried in the given order
    pub fn with_sources(output: &'a dyn Output, sources: Vec<Box<dyn CandidateSource + 'a>>) -> Self {
        Self { output, sources }
    }

    /// Labels of the sources in query order
    pub fn search_order(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.label()).collect()
    }

    /// Resolve one requirement declared by `dependent`
    ///
    /// Returns `Unchanged` for requirements without a range and for
    /// downstream pins that satisfy the range, `Resolved` with the best
    /// candidate otherwise.
    pub fn resolve(&self, requirement: &Requirement, dependent: &PackageReference) -> Result<Resolution> {
        let Some(range) = requirement.version_range.as_deref() else {
            return Ok(Resolution::Unchanged);
        };

        if requirement.is_resolved() {
            return self.check_pinned(requirement, range, dependent);
        }

        let pattern = requirement.reference.search_pattern();
        for source in &self.sources {
            let found = source.candidates(&pattern)?;
            debug!("{} returned {} candidates for {}", source.label(), found.len(), pattern);
            if found.is_empty() {
                continue;
            }
            if let Some(version) = self.best_version(requirement, range, dependent, &found)? {
                let resolved = requirement.reference.with_version(version);
                self.output.success(&format!(
                    "Version range '{}' required by '{}' resolved to '{}'",
                    range, dependent, resolved
                ));
                return Ok(Resolution::Resolved(resolved));
            }
            debug!("No candidate from {} satisfies '{}'", source.label(), range);
        }

        let err = Error::UnresolvableRange {
            range: range.to_string(),
            requirement: requirement.to_string(),
        };
        self.output.error(&err.to_string());
        Err(err)
    }

    /// Resolve every requirement of a package and apply the results in place
    pub fn resolve_all(&self, requirements: &mut Requirements, dependent: &PackageReference) -> Result<()> {
        for requirement in requirements.iter_mut() {
            let resolution = self.resolve(requirement, dependent)?;
            requirement.apply(resolution);
        }
        Ok(())
    }

    fn check_pinned(
        &self,
        requirement: &Requirement,
        range: &str,
        dependent: &PackageReference,
    ) -> Result<Resolution> {
        let pinned = &requirement.reference;
        if self
            .best_version(requirement, range, dependent, std::slice::from_ref(pinned))?
            .is_none()
        {
            let err = Error::RangeConflict {
                range: range.to_string(),
                dependent: dependent.to_string(),
                pinned: pinned.to_string(),
            };
            self.output.error(&err.to_string());
            return Err(err);
        }

        self.output.success(&format!(
            "Version range '{}' required by '{}' valid for downstream requirement '{}'",
            range, dependent, pinned
        ));
        Ok(Resolution::Unchanged)
    }

    /// Highest candidate version inside the range
    ///
    /// A malformed range is reported with the requirement and its dependent
    /// before the error is returned.
    fn best_version(
        &self,
        requirement: &Requirement,
        range: &str,
        dependent: &PackageReference,
        found: &[PackageReference],
    ) -> Result<Option<String>> {
        satisfying(found.iter().map(|r| r.version.as_str()), range, self.output).inspect_err(|err| {
            self.output.error(&format!(
                "Version range '{}' required by '{}' in requirement '{}' cannot be used: {}",
                range, dependent, requirement, err
            ));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{BufferOutput, Level};
    use std::cell::Cell;

    fn refs(name: &str, versions: &[&str]) -> Vec<PackageReference> {
        versions
            .iter()
            .map(|v| PackageReference::new(name, *v, "user", "channel"))
            .collect()
    }

    struct Local {
        refs: Vec<PackageReference>,
        calls: Cell<usize>,
    }

    impl Local {
        fn new(refs: Vec<PackageReference>) -> Self {
            Self { refs, calls: Cell::new(0) }
        }
    }

    impl LocalSearch for Local {
        fn search_recipes(&self, pattern: &str) -> Result<Vec<PackageReference>> {
            self.calls.set(self.calls.get() + 1);
            let p = crate::search::ReferencePattern::new(pattern, false)?;
            Ok(self.refs.iter().filter(|r| p.matches(r)).cloned().collect())
        }
    }

    struct Remote {
        refs: Vec<PackageReference>,
        ignorecase_seen: Cell<Option<bool>>,
    }

    impl Remote {
        fn new(refs: Vec<PackageReference>) -> Self {
            Self {
                refs,
                ignorecase_seen: Cell::new(None),
            }
        }
    }

    impl RemoteSearch for Remote {
        fn search_remotes(&self, pattern: &str, ignorecase: bool) -> Result<Vec<PackageReference>> {
            self.ignorecase_seen.set(Some(ignorecase));
            let p = crate::search::ReferencePattern::new(pattern, ignorecase)?;
            Ok(self.refs.iter().filter(|r| p.matches(r)).cloned().collect())
        }
    }

    fn ranged(name: &str, range: &str) -> Requirement {
        Requirement::new(PackageReference::new(name, format!("[{}]", range), "user", "channel"))
    }

    fn dependent() -> PackageReference {
        PackageReference::new("Hello", "1.2", "user", "channel")
    }

    #[test]
    fn test_no_range_is_noop() {
        let output = BufferOutput::new();
        let local = Local::new(Vec::new());
        let remote = Remote::new(Vec::new());
        let resolver = RequireResolver::new(&output, Some(&local), &remote, false);

        let req = Requirement::new(PackageReference::new("Say", "1.0", "user", "channel"));
        assert_eq!(resolver.resolve(&req, &dependent()).unwrap(), Resolution::Unchanged);
        assert_eq!(local.calls.get(), 0);
        assert!(output.entries().is_empty());
    }

    #[test]
    fn test_resolves_best_local_version() {
        let output = BufferOutput::new();
        let local = Local::new(refs("Say", &["1.0", "1.5", "2.0", "2.1"]));
        let remote = Remote::new(Vec::new());
        let resolver = RequireResolver::new(&output, Some(&local), &remote, false);

        let resolution = resolver.resolve(&ranged("Say", ">=1.2,<2.0"), &dependent()).unwrap();
        assert_eq!(
            resolution,
            Resolution::Resolved(PackageReference::new("Say", "1.5", "user", "channel"))
        );
        assert!(output.contains(
            "Version range '>=1.2,<2.0' required by 'Hello/1.2@user/channel' resolved to 'Say/1.5@user/channel'"
        ));
        assert_eq!(remote.ignorecase_seen.get(), None);
    }

    #[test]
    fn test_precedence_follows_update_mode() {
        let local = Local::new(refs("Say", &["1.1"]));
        let remote = Remote::new(refs("Say", &["1.3"]));
        let req = ranged("Say", ">=1.0");

        let output = BufferOutput::new();
        let resolver = RequireResolver::new(&output, Some(&local), &remote, false);
        assert_eq!(resolver.search_order(), vec!["local cache", "remotes"]);
        let Resolution::Resolved(r) = resolver.resolve(&req, &dependent()).unwrap() else {
            panic!("expected a resolution");
        };
        assert_eq!(r.version, "1.1");

        let resolver = RequireResolver::new(&output, Some(&local), &remote, true);
        assert_eq!(resolver.search_order(), vec!["remotes", "local cache"]);
        let Resolution::Resolved(r) = resolver.resolve(&req, &dependent()).unwrap() else {
            panic!("expected a resolution");
        };
        assert_eq!(r.version, "1.3");
    }

    #[test]
    fn test_falls_through_when_local_does_not_satisfy() {
        let output = BufferOutput::new();
        let local = Local::new(refs("Say", &["0.5"]));
        let remote = Remote::new(refs("Say", &["1.4"]));
        let resolver = RequireResolver::new(&output, Some(&local), &remote, false);

        let resolution = resolver.resolve(&ranged("Say", ">=1.0"), &dependent()).unwrap();
        assert_eq!(
            resolution,
            Resolution::Resolved(PackageReference::new("Say", "1.4", "user", "channel"))
        );
        assert_eq!(local.calls.get(), 1);
        assert_eq!(remote.ignorecase_seen.get(), Some(false));
    }

    #[test]
    fn test_remote_search_is_case_sensitive() {
        let output = BufferOutput::new();
        let remote = Remote::new(refs("Foo", &["2.0"]));
        let resolver = RequireResolver::new(&output, None, &remote, false);

        let err = resolver.resolve(&ranged("foo", ">=1.0"), &dependent()).unwrap_err();
        assert!(matches!(err, Error::UnresolvableRange { .. }));
        assert_eq!(remote.ignorecase_seen.get(), Some(false));
    }

    #[test]
    fn test_unresolvable_range() {
        let output = BufferOutput::new();
        let local = Local::new(refs("Say", &["1.0", "2.0"]));
        let remote = Remote::new(Vec::new());
        let resolver = RequireResolver::new(&output, Some(&local), &remote, false);

        let err = resolver.resolve(&ranged("Say", ">=3.0"), &dependent()).unwrap_err();
        assert!(matches!(err, Error::UnresolvableRange { .. }));
        assert_eq!(
            err.to_string(),
            "The version in '>=3.0' from requirement 'Say/[>=3.0]@user/channel' could not be resolved"
        );
        assert!(output.contains("could not be resolved"));
    }

    #[test]
    fn test_downstream_pin_conflict() {
        let output = BufferOutput::new();
        let local = Local::new(refs("Say", &["2.5"]));
        let remote = Remote::new(Vec::new());
        let resolver = RequireResolver::new(&output, Some(&local), &remote, false);

        let mut req = ranged("Say", ">=2.0");
        req.pin(PackageReference::new("Say", "1.5", "user", "channel"));
        let before = req.reference.clone();

        let err = resolver.resolve(&req, &dependent()).unwrap_err();
        assert!(matches!(err, Error::RangeConflict { .. }));
        assert!(err.to_string().contains("not valid for downstream requirement 'Say/1.5@user/channel'"));
        assert_eq!(req.reference, before);
        assert_eq!(local.calls.get(), 0);
    }

    #[test]
    fn test_downstream_pin_inside_range_is_kept() {
        let output = BufferOutput::new();
        let local = Local::new(refs("Say", &["1.9"]));
        let remote = Remote::new(Vec::new());
        let resolver = RequireResolver::new(&output, Some(&local), &remote, false);

        let mut req = ranged("Say", ">=1.0,<2");
        req.pin(PackageReference::new("Say", "1.5", "user", "channel"));

        assert_eq!(resolver.resolve(&req, &dependent()).unwrap(), Resolution::Unchanged);
        assert!(output.contains("valid for downstream requirement 'Say/1.5@user/channel'"));
        assert_eq!(local.calls.get(), 0);
    }

    #[test]
    fn test_resolving_twice_is_idempotent() {
        let output = BufferOutput::new();
        let local = Local::new(refs("Say", &["1.0", "1.5"]));
        let remote = Remote::new(Vec::new());
        let resolver = RequireResolver::new(&output, Some(&local), &remote, false);

        let mut req = ranged("Say", ">=1.0");
        let first = resolver.resolve(&req, &dependent()).unwrap();
        req.apply(first);
        let pinned = req.reference.clone();

        assert_eq!(resolver.resolve(&req, &dependent()).unwrap(), Resolution::Unchanged);
        assert_eq!(req.reference, pinned);
    }

    #[test]
    fn test_malformed_range_propagates() {
        let output = BufferOutput::new();
        let local = Local::new(refs("Say", &["1.0"]));
        let remote = Remote::new(Vec::new());
        let resolver = RequireResolver::new(&output, Some(&local), &remote, false);

        let err = resolver.resolve(&ranged("Say", ">>1"), &dependent()).unwrap_err();
        assert!(matches!(err, Error::MalformedRange { .. }));

        let errors = output.messages(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Version range '>>1' required by 'Hello/1.2@user/channel'"));
        assert!(errors[0].contains("in requirement 'Say/[>>1]@user/channel'"));
    }

    #[test]
    fn test_malformed_range_against_pin_is_reported() {
        let output = BufferOutput::new();
        let remote = Remote::new(Vec::new());
        let resolver = RequireResolver::new(&output, None, &remote, false);

        let mut req = ranged("Say", "~1.18446744073709551615");
        req.pin(PackageReference::new("Say", "1.5", "user", "channel"));

        let err = resolver.resolve(&req, &dependent()).unwrap_err();
        assert!(matches!(err, Error::MalformedRange { .. }));
        assert!(output.messages(Level::Error)[0].contains("required by 'Hello/1.2@user/channel'"));
    }

    #[test]
    fn test_resolve_all_applies_in_order() {
        let output = BufferOutput::new();
        let local = Local::new(
            refs("Say", &["0.1", "0.3", "1.1"])
                .into_iter()
                .chain(refs("Bye", &["2.0", "2.4"]))
                .collect(),
        );
        let remote = Remote::new(Vec::new());
        let resolver = RequireResolver::new(&output, Some(&local), &remote, false);

        let mut reqs = Requirements::new();
        reqs.add(ranged("Say", ">0.1,<1"));
        reqs.add(ranged("Bye", "~2"));
        reqs.add(Requirement::new(PackageReference::new("Fixed", "3.0", "user", "channel")));

        resolver.resolve_all(&mut reqs, &dependent()).unwrap();
        assert_eq!(reqs.get("Say").unwrap().reference.version, "0.3");
        assert_eq!(reqs.get("Bye").unwrap().reference.version, "2.4");
        assert_eq!(reqs.get("Fixed").unwrap().reference.version, "3.0");
    }
}
