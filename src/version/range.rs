// src/version/range.rs

//! Version range expressions
//!
//! A range is one or more alternatives separated by `||`; each alternative
//! is a whitespace-separated list of comparators that must all hold.
//! Partial versions, tilde, caret and hyphen forms are expanded into plain
//! comparators when the range is parsed:
//!
//! - `1.2` -> `>=1.2.0 <1.3.0-0`
//! - `>1` -> `>=2.0.0`
//! - `<=1.3` -> `<1.4.0-0`
//! - `~1.2.3` -> `>=1.2.3 <1.3.0-0`
//! - `^0.2.3` -> `>=0.2.3 <0.3.0-0`
//! - `1.2 - 2.3` -> `>=1.2.0 <2.4.0-0`

use super::{lowest_prerelease, scan};
use crate::error::{Error, Result};
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: Op,
    version: Version,
}

impl Comparator {
    fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    fn matches(&self, v: &Version) -> bool {
        match self.op {
            Op::Lt => v < &self.version,
            Op::Le => v <= &self.version,
            Op::Gt => v > &self.version,
            Op::Ge => v >= &self.version,
            Op::Eq => v == &self.version,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Eq => "=",
        };
        write!(f, "{}{}", op, self.version)
    }
}

/// Range-level operator written in front of a version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeOp {
    Plain,
    Cmp(Op),
    Tilde,
    Caret,
}

// Longest operators first so `>=` is not read as `>`.
const OPERATORS: &[(&str, RangeOp)] = &[
    ("~>", RangeOp::Tilde),
    ("~=", RangeOp::Tilde),
    (">=", RangeOp::Cmp(Op::Ge)),
    ("<=", RangeOp::Cmp(Op::Le)),
    ("~", RangeOp::Tilde),
    ("^", RangeOp::Caret),
    (">", RangeOp::Cmp(Op::Gt)),
    ("<", RangeOp::Cmp(Op::Lt)),
    ("=", RangeOp::Cmp(Op::Eq)),
];

/// A partial version: missing or wildcard components are `None`
#[derive(Debug, Clone)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    fn parse(s: &str) -> std::result::Result<Self, String> {
        let scanned = scan(s)?;
        let pre = scanned.prerelease()?;
        let part = |i: usize| scanned.parts.get(i).copied().flatten();

        // Anything after a wildcard is a wildcard too: `1.x.3` == `1.x`
        let major = part(0);
        let minor = major.and(part(1));
        let patch = minor.and(part(2));

        Ok(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

    /// Lowest version covered, missing components as zero
    fn floor(&self) -> Version {
        let mut v = version(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        );
        if self.patch.is_some() {
            v.pre = self.pre.clone();
        }
        v
    }

    /// Exclusive upper bound of a partial version, `None` for a full one
    fn ceiling(&self) -> std::result::Result<Option<Version>, String> {
        Ok(match (self.major, self.minor, self.patch) {
            (None, _, _) => None,
            (Some(major), None, _) => Some(pre0(bump(major)?, 0, 0)),
            (Some(major), Some(minor), None) => Some(pre0(major, bump(minor)?, 0)),
            _ => None,
        })
    }
}

/// Next value of a version component
fn bump(n: u64) -> std::result::Result<u64, String> {
    n.checked_add(1)
        .ok_or_else(|| format!("version component too large: {}", n))
}

fn version(major: u64, minor: u64, patch: u64) -> Version {
    Version {
        major,
        minor,
        patch,
        pre: Prerelease::EMPTY,
        build: BuildMetadata::EMPTY,
    }
}

/// `major.minor.patch-0`, the lowest version of that triple
fn pre0(major: u64, minor: u64, patch: u64) -> Version {
    let mut v = version(major, minor, patch);
    v.pre = lowest_prerelease();
    v
}

fn any() -> Vec<Comparator> {
    vec![Comparator::new(Op::Ge, version(0, 0, 0))]
}

fn nothing() -> Vec<Comparator> {
    vec![Comparator::new(Op::Lt, pre0(0, 0, 0))]
}

/// A parsed version range expression
#[derive(Debug, Clone)]
pub struct VersionRange {
    raw: String,
    alternatives: Vec<Vec<Comparator>>,
}

impl VersionRange {
    /// Parse a space-separated range expression
    pub fn parse(expr: &str) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedRange {
            range: expr.to_string(),
            reason,
        };

        let mut alternatives = Vec::new();
        for alternative in expr.split("||") {
            let comparators = parse_alternative(alternative.trim()).map_err(malformed)?;
            alternatives.push(comparators);
        }

        Ok(Self {
            raw: expr.to_string(),
            alternatives,
        })
    }

    /// Check whether a version lies inside the range
    ///
    /// A prerelease only matches an alternative that names a prerelease of
    /// the same `major.minor.patch`.
    pub fn matches(&self, v: &Version) -> bool {
        self.alternatives.iter().any(|set| {
            if !set.iter().all(|c| c.matches(v)) {
                return false;
            }
            if v.pre.is_empty() {
                return true;
            }
            set.iter().any(|c| {
                !c.version.pre.is_empty()
                    && c.version.major == v.major
                    && c.version.minor == v.minor
                    && c.version.patch == v.patch
            })
        })
    }

    /// The expression as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The expanded comparator form, e.g. `>=1.2.0 <1.3.0-0`
    pub fn normalized(&self) -> String {
        self.alternatives
            .iter()
            .map(|set| {
                set.iter()
                    .map(Comparator::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join(" || ")
    }
}

fn parse_alternative(alternative: &str) -> std::result::Result<Vec<Comparator>, String> {
    if alternative.is_empty() {
        return Ok(any());
    }

    if let Some((from, to)) = alternative.split_once(" - ") {
        return parse_hyphen(from.trim(), to.trim());
    }

    let mut comparators = Vec::new();
    let mut pending: Option<&str> = None;
    for token in alternative.split_whitespace() {
        // Operators may be separated from their version: `>= 1.2`
        if is_operator(token) {
            if let Some(op) = pending {
                return Err(format!("operator '{}' followed by '{}'", op, token));
            }
            pending = Some(token);
            continue;
        }
        let expanded = match pending.take() {
            Some(op) => parse_comparator(&format!("{}{}", op, token))?,
            None => parse_comparator(token)?,
        };
        comparators.extend(expanded);
    }
    if let Some(op) = pending {
        return Err(format!("operator '{}' without a version", op));
    }
    Ok(comparators)
}

fn is_operator(token: &str) -> bool {
    OPERATORS.iter().any(|(op, _)| *op == token)
}

fn split_operator(token: &str) -> (RangeOp, &str) {
    for (op, kind) in OPERATORS {
        if let Some(rest) = token.strip_prefix(op) {
            return (*kind, rest);
        }
    }
    (RangeOp::Plain, token)
}

fn parse_comparator(token: &str) -> std::result::Result<Vec<Comparator>, String> {
    let (op, body) = split_operator(token);
    let p = Partial::parse(body)?;

    let Some(major) = p.major else {
        // `*`, `>=*`, `~x`... everything except strict bounds means any
        return Ok(match op {
            RangeOp::Cmp(Op::Lt) | RangeOp::Cmp(Op::Gt) => nothing(),
            _ => any(),
        });
    };

    let floor = p.floor();
    let ceiling = match op {
        RangeOp::Cmp(Op::Ge) | RangeOp::Tilde | RangeOp::Caret => None,
        _ => p.ceiling()?,
    };

    let comparators = match op {
        RangeOp::Plain | RangeOp::Cmp(Op::Eq) => match ceiling {
            Some(ceiling) => vec![
                Comparator::new(Op::Ge, floor),
                Comparator::new(Op::Lt, ceiling),
            ],
            None => vec![Comparator::new(Op::Eq, floor)],
        },
        RangeOp::Cmp(Op::Gt) => match ceiling {
            Some(ceiling) => vec![Comparator::new(Op::Ge, strip_pre(ceiling))],
            None => vec![Comparator::new(Op::Gt, floor)],
        },
        RangeOp::Cmp(Op::Ge) => vec![Comparator::new(Op::Ge, floor)],
        RangeOp::Cmp(Op::Lt) => match ceiling {
            Some(_) => vec![Comparator::new(Op::Lt, pre0(floor.major, floor.minor, 0))],
            None => vec![Comparator::new(Op::Lt, floor)],
        },
        RangeOp::Cmp(Op::Le) => match ceiling {
            Some(ceiling) => vec![Comparator::new(Op::Lt, ceiling)],
            None => vec![Comparator::new(Op::Le, floor)],
        },
        RangeOp::Tilde => {
            let upper = match p.minor {
                Some(minor) => pre0(major, bump(minor)?, 0),
                None => pre0(bump(major)?, 0, 0),
            };
            vec![Comparator::new(Op::Ge, floor), Comparator::new(Op::Lt, upper)]
        }
        RangeOp::Caret => {
            let upper = match (p.minor, p.patch) {
                _ if major > 0 => pre0(bump(major)?, 0, 0),
                (None, _) => pre0(1, 0, 0),
                (Some(0), Some(patch)) => pre0(0, 0, bump(patch)?),
                (Some(minor), _) => pre0(0, bump(minor)?, 0),
            };
            vec![Comparator::new(Op::Ge, floor), Comparator::new(Op::Lt, upper)]
        }
    };
    Ok(comparators)
}

fn parse_hyphen(from: &str, to: &str) -> std::result::Result<Vec<Comparator>, String> {
    let from = Partial::parse(from)?;
    let to = Partial::parse(to)?;

    let mut comparators = Vec::with_capacity(2);
    if from.major.is_some() {
        comparators.push(Comparator::new(Op::Ge, from.floor()));
    }
    if to.major.is_some() {
        match to.ceiling()? {
            Some(ceiling) => comparators.push(Comparator::new(Op::Lt, ceiling)),
            None => comparators.push(Comparator::new(Op::Le, to.floor())),
        }
    }
    if comparators.is_empty() {
        return Ok(any());
    }
    Ok(comparators)
}

fn strip_pre(mut v: Version) -> Version {
    v.pre = Prerelease::EMPTY;
    v
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for VersionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        VersionRange::parse(s)
    }
}
