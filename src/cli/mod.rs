// src/cli/mod.rs
//! CLI definitions for depresolve
//!
//! This module contains the command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod remote;

pub use remote::RemoteCommands;

#[derive(Parser)]
#[command(name = "depresolve")]
#[command(version)]
#[command(about = "Resolve version-range requirements against local and remote recipes", long_about = None)]
pub struct Cli {
    /// Config file (default: <home>/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a requirement declared with a version range
    Resolve {
        /// Requirement, e.g. "Say/[>=1.0,<2.0]@memsharded/testing"
        requirement: String,

        /// Reference of the package declaring the requirement
        #[arg(long)]
        by: String,

        /// Reference already pinned by a downstream package
        #[arg(long)]
        pin: Option<String>,

        /// Prefer remotes over the local cache
        #[arg(short, long, overrides_with = "no_update")]
        update: bool,

        /// Prefer the local cache even if the config enables update mode
        #[arg(long, overrides_with = "update")]
        no_update: bool,

        /// Only search this remote
        #[arg(short, long)]
        remote: Option<String>,
    },

    /// Print the highest version satisfying a range
    Satisfy {
        /// Range expression, e.g. ">1.0,<2.1"
        range: String,

        /// Candidate versions
        #[arg(required = true)]
        versions: Vec<String>,
    },

    /// Search recipes by reference pattern
    Search {
        /// Glob over the full reference, e.g. "Say/*@memsharded/testing"
        pattern: String,

        /// Search the remotes instead of the local cache
        #[arg(long)]
        remotes: bool,

        /// Case-insensitive matching (remotes only)
        #[arg(short, long)]
        ignore_case: bool,

        /// Only search this remote
        #[arg(short, long)]
        remote: Option<String>,
    },

    /// Register a recipe in the local cache
    Export {
        /// Pinned reference, e.g. "Say/1.1@memsharded/testing"
        reference: String,
    },

    /// Remote registry management
    #[command(subcommand)]
    Remote(RemoteCommands),
}

/// `--update`/`--no-update` pair; `None` defers to the config file
pub fn flag_pair(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
