// src/lib.rs

//! depresolve: version-range requirement resolution
//!
//! Packages declare requirements on other packages either pinned
//! (`zlib/1.2.11@conan/stable`) or with a version range
//! (`zlib/[>=1.2,<2.0]@conan/stable`). This crate picks the concrete version
//! a range resolves to.
//!
//! # Architecture
//!
//! - `version`: loose semver parsing and range satisfaction
//! - `resolver`: turns a ranged requirement into a pinned reference using
//!   candidates from the local cache and the remotes
//! - `search`: the local recipe cache, the remote registry and remote indices
//! - `output`: user-facing diagnostics sink

pub mod config;
mod error;
pub mod output;
pub mod reference;
pub mod requirement;
pub mod resolver;
pub mod search;
pub mod version;

pub use config::Config;
pub use error::{Error, Result};
pub use output::{BufferOutput, Output, SilentOutput, TracingOutput};
pub use reference::PackageReference;
pub use requirement::{Requirement, Requirements};
pub use resolver::{CandidateSource, RequireResolver, Resolution, SearchOrder};
pub use search::{
    IndexClient, LocalSearch, RecipeCache, Remote, RemoteClient, RemoteRegistry, RemoteSearch,
    RemoteSearcher,
};
pub use version::{parse_loose, satisfying, ParsedVersion, VersionRange};
