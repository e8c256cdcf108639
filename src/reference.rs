// src/reference.rs

//! Package references identifying a recipe
//!
//! References use the format `name/version@user/channel`:
//!
//! - `zlib/1.2.11@conan/stable` - a pinned reference
//! - `Say/[>=1.0,<2.0]@memsharded/testing` - a reference carrying a version range
//!
//! The version component is either a concrete version or a bracketed range
//! expression. A reference with a concrete version is *pinned*.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

const MIN_FIELD_LEN: usize = 2;
const MAX_FIELD_LEN: usize = 51;

/// A package reference: `name/version@user/channel`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageReference {
    pub name: String,
    pub version: String,
    pub user: String,
    pub channel: String,
}

impl PackageReference {
    /// Create a reference without validating its components
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        user: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            user: user.into(),
            channel: channel.into(),
        }
    }

    /// Parse a reference from `name/version@user/channel`
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = |reason: &str| Error::InvalidReference {
            reference: s.to_string(),
            reason: reason.to_string(),
        };

        let at_pos = s.rfind('@').ok_or_else(|| invalid("missing '@user/channel'"))?;
        let (left, right) = (&s[..at_pos], &s[at_pos + 1..]);

        let (name, version) = left
            .split_once('/')
            .ok_or_else(|| invalid("missing '/version'"))?;
        let (user, channel) = right
            .split_once('/')
            .ok_or_else(|| invalid("missing '/channel'"))?;

        validate_field(s, "name", name)?;
        validate_field(s, "user", user)?;
        validate_field(s, "channel", channel)?;
        validate_version(s, version)?;

        Ok(Self::new(name.trim(), version.trim(), user, channel))
    }

    /// Whether the version is concrete rather than a range
    pub fn is_pinned(&self) -> bool {
        self.range().is_none()
    }

    /// The range expression inside the brackets, if the version is a range
    pub fn range(&self) -> Option<&str> {
        self.version
            .strip_prefix('[')
            .and_then(|v| v.strip_suffix(']'))
    }

    /// Same name, user and channel with a different version
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            version: version.into(),
            user: self.user.clone(),
            channel: self.channel.clone(),
        }
    }

    /// Search pattern matching every version of this recipe
    ///
    /// For example `Say/[~1.1]@memsharded/testing` -> `Say/*@memsharded/testing`
    pub fn search_pattern(&self) -> String {
        format!("{}/*@{}/{}", self.name, self.user, self.channel)
    }
}

fn validate_field(reference: &str, field: &str, value: &str) -> Result<()> {
    let invalid = |reason: String| Error::InvalidReference {
        reference: reference.to_string(),
        reason,
    };

    let len = value.chars().count();
    if !(MIN_FIELD_LEN..=MAX_FIELD_LEN).contains(&len) {
        return Err(invalid(format!(
            "{} '{}' must be between {} and {} characters",
            field, value, MIN_FIELD_LEN, MAX_FIELD_LEN
        )));
    }
    if !value.chars().all(valid_char) {
        return Err(invalid(format!("{} '{}' contains invalid characters", field, value)));
    }
    if value.starts_with(['+', '.', '-']) {
        return Err(invalid(format!(
            "{} '{}' must start with a letter, digit or underscore",
            field, value
        )));
    }
    Ok(())
}

fn validate_version(reference: &str, version: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidReference {
        reference: reference.to_string(),
        reason: reason.to_string(),
    };

    let version = version.trim();
    if version.is_empty() {
        return Err(invalid("empty version"));
    }
    if version.starts_with('[') {
        if !version.ends_with(']') {
            return Err(invalid("unterminated version range"));
        }
        return Ok(());
    }
    if !version.chars().all(valid_char) {
        return Err(invalid("version contains invalid characters"));
    }
    Ok(())
}

fn valid_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '.' | '-')
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}/{}", self.name, self.version, self.user, self.channel)
    }
}

impl FromStr for PackageReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PackageReference::parse(s)
    }
}
