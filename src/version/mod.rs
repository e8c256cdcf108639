// src/version/mod.rs

//! Loose semantic-version parsing and range satisfaction
//!
//! Recipe versions in the wild are rarely strict semver: `2.1`, `v1.0.3` and
//! `1.2.3beta` all show up. Candidates are parsed loosely (missing minor and
//! patch coerce to zero) and compared with standard semver precedence.
//! Strings that cannot be read as a version at all are skipped with a
//! warning rather than failing the whole comparison.

mod range;

pub use range::VersionRange;

use crate::error::Result;
use crate::output::Output;
use semver::{BuildMetadata, Prerelease, Version};
use std::collections::BTreeMap;
use tracing::debug;

/// Outcome of loosely parsing a single version string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedVersion {
    /// Comparable version, build metadata stripped
    Parsed(Version),
    /// Not a version; carries the reason
    Unparseable(String),
}

/// Parse a version string loosely
///
/// Examples:
/// - "1.2.3" -> 1.2.3
/// - "2.1" -> 2.1.0
/// - "v1.0.3-rc.1+build5" -> 1.0.3-rc.1
/// - "1.2.3beta" -> 1.2.3-beta
/// - "master" -> Unparseable
pub fn parse_loose(s: &str) -> ParsedVersion {
    let scanned = match scan(s) {
        Ok(scanned) => scanned,
        Err(reason) => return ParsedVersion::Unparseable(reason),
    };

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&scanned.parts) {
        match part {
            Some(n) => *slot = *n,
            None => return ParsedVersion::Unparseable(format!("wildcard in version '{}'", s)),
        }
    }

    let pre = match scanned.prerelease() {
        Ok(pre) => pre,
        Err(reason) => return ParsedVersion::Unparseable(reason),
    };
    if let Some(build) = scanned.build {
        if let Err(e) = BuildMetadata::new(build) {
            return ParsedVersion::Unparseable(format!("invalid build metadata '{}': {}", build, e));
        }
    }

    ParsedVersion::Parsed(Version {
        major: numbers[0],
        minor: numbers[1],
        patch: numbers[2],
        pre,
        build: BuildMetadata::EMPTY,
    })
}

/// Components read from a version or partial version string
///
/// `parts` has one to three entries; `None` marks a wildcard (`x`, `X`, `*`).
#[derive(Debug)]
pub(crate) struct Scanned<'a> {
    pub parts: Vec<Option<u64>>,
    pub pre: Option<&'a str>,
    pub build: Option<&'a str>,
}

impl Scanned<'_> {
    /// Prerelease identifiers; a bare trailing `-` means the lowest prerelease
    pub fn prerelease(&self) -> std::result::Result<Prerelease, String> {
        match self.pre {
            None => Ok(Prerelease::EMPTY),
            Some("") => Ok(lowest_prerelease()),
            Some(pre) => Prerelease::new(pre)
                .map_err(|e| format!("invalid prerelease '{}': {}", pre, e)),
        }
    }
}

pub(crate) fn lowest_prerelease() -> Prerelease {
    Prerelease::new("0").unwrap_or_default()
}

pub(crate) fn scan(input: &str) -> std::result::Result<Scanned<'_>, String> {
    let s = input
        .trim_start_matches(|c: char| c == 'v' || c == 'V' || c == '=' || c.is_whitespace())
        .trim_end();
    let (s, build) = match s.split_once('+') {
        Some((main, build)) => (main, Some(build)),
        None => (s, None),
    };

    let mut parts = Vec::with_capacity(3);
    let mut rest = s;
    loop {
        if let Some(r) = rest.strip_prefix(['x', 'X', '*']) {
            parts.push(None);
            rest = r;
        } else {
            let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            if digits == 0 {
                return Err(format!("expected a number in '{}'", input));
            }
            let n = rest[..digits]
                .parse::<u64>()
                .map_err(|e| format!("invalid number in '{}': {}", input, e))?;
            parts.push(Some(n));
            rest = &rest[digits..];
        }

        if parts.len() == 3 {
            break;
        }
        match rest.strip_prefix('.') {
            Some(r) => rest = r,
            None => break,
        }
    }

    let pre = if rest.is_empty() {
        None
    } else if let Some(pre) = rest.strip_prefix('-') {
        Some(pre)
    } else if matches!(parts.last(), Some(Some(_))) && rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        Some(rest)
    } else {
        return Err(format!("unexpected '{}' in '{}'", rest, input));
    };

    Ok(Scanned { parts, pre, build })
}

/// Candidate versions keyed by their parsed form
///
/// Strings that parse to the same version collapse onto one entry; the last
/// one seen wins.
#[derive(Debug, Default)]
pub struct CandidateSet {
    entries: BTreeMap<Version, String>,
}

impl CandidateSet {
    /// Parse every candidate, warning about the ones that are not versions
    pub fn collect<I, S>(candidates: I, output: &dyn Output) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = BTreeMap::new();
        for candidate in candidates {
            let raw = candidate.as_ref();
            match parse_loose(raw) {
                ParsedVersion::Parsed(version) => {
                    entries.insert(version, raw.to_string());
                }
                ParsedVersion::Unparseable(reason) => {
                    debug!("Skipping candidate '{}': {}", raw, reason);
                    output.warn(&format!(
                        "Version '{}' is not semver, cannot be compared with a range",
                        raw
                    ));
                }
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Original string of the highest candidate inside the range
    pub fn max_satisfying(&self, range: &VersionRange) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(version, _)| range.matches(version))
            .map(|(_, raw)| raw.as_str())
    }
}

/// Maximum candidate satisfying a comma-separated range expression
///
/// Commas are AND separators and are turned into spaces before the range is
/// parsed. Unparseable candidates are reported through `output` and skipped;
/// a malformed range is an error.
pub fn satisfying<I, S>(candidates: I, range_expr: &str, output: &dyn Output) -> Result<Option<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let candidates = CandidateSet::collect(candidates, output);
    let range = VersionRange::parse(&range_expr.replace(',', " "))?;
    Ok(candidates.max_satisfying(&range).map(str::to_string))
}
