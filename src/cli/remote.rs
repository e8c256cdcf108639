// src/cli/remote.rs
//! Remote registry commands

use clap::Subcommand;

#[derive(Subcommand)]
pub enum RemoteCommands {
    /// List remotes in priority order
    List,

    /// Add a remote at the lowest priority
    Add {
        /// Remote name
        name: String,

        /// Remote URL
        url: String,

        /// Do not verify the remote's SSL certificate
        #[arg(long)]
        insecure: bool,
    },

    /// Remove a remote and the references recorded against it
    Remove {
        /// Remote name
        name: String,
    },
}
