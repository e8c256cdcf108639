// src/error.rs

//! Error types for reference parsing, range resolution and search backends

use thiserror::Error;

/// Errors produced by the resolver and its collaborators
#[derive(Error, Debug)]
pub enum Error {
    /// A pinned downstream reference does not satisfy an upstream range
    #[error(
        "Version range '{range}' required by '{dependent}' not valid for downstream requirement '{pinned}'"
    )]
    RangeConflict {
        range: String,
        dependent: String,
        pinned: String,
    },

    /// No search source produced a version satisfying the range
    #[error("The version in '{range}' from requirement '{requirement}' could not be resolved")]
    UnresolvableRange { range: String, requirement: String },

    /// The range expression itself cannot be parsed
    #[error("Invalid version range '{range}': {reason}")]
    MalformedRange { range: String, reason: String },

    /// A package reference string is not `name/version@user/channel`
    #[error("Invalid package reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    /// A search pattern could not be compiled
    #[error("Invalid search pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Remote registry file problems
    #[error("Remote registry error: {0}")]
    Registry(String),

    /// The requested remote is not in the registry
    #[error("Remote '{0}' not found in remotes")]
    RemoteNotFound(String),

    /// The registry has no remotes at all
    #[error("No default remote defined in {0}")]
    NoRemoteAvailable(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be decoded
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Remote index snapshot could not be decoded
    #[error("Index error: {0}")]
    Index(#[from] serde_json::Error),
}

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, Error>;
