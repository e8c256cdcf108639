// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, RemoteCommands};
use commands::Context;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Satisfy { range, versions } => commands::cmd_satisfy(&range, &versions),
        command => {
            let ctx = Context::load(cli.config.as_deref())?;
            dispatch(&ctx, command)
        }
    }
}

fn dispatch(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Resolve {
            requirement,
            by,
            pin,
            update,
            no_update,
            remote,
        } => commands::cmd_resolve(
            ctx,
            &requirement,
            &by,
            pin.as_deref(),
            cli::flag_pair(update, no_update),
            remote.as_deref(),
        ),
        Commands::Satisfy { range, versions } => commands::cmd_satisfy(&range, &versions),
        Commands::Search {
            pattern,
            remotes,
            ignore_case,
            remote,
        } => commands::cmd_search(ctx, &pattern, remotes, ignore_case, remote.as_deref()),
        Commands::Export { reference } => commands::cmd_export(ctx, &reference),
        Commands::Remote(RemoteCommands::List) => commands::cmd_remote_list(ctx),
        Commands::Remote(RemoteCommands::Add {
            name,
            url,
            insecure,
        }) => commands::cmd_remote_add(ctx, &name, &url, insecure),
        Commands::Remote(RemoteCommands::Remove { name }) => commands::cmd_remote_remove(ctx, &name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from([
            "depresolve",
            "-v",
            "resolve",
            "Say/[>=1.0]@memsharded/testing",
            "--by",
            "Hello/1.2@memsharded/testing",
            "--update",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Resolve { by, update, pin, .. } = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(by, "Hello/1.2@memsharded/testing");
        assert!(update);
        assert_eq!(pin, None);
    }

    #[test]
    fn test_update_flags_override_each_other() {
        let parse = |args: &[&str]| {
            let mut argv = vec!["depresolve", "resolve", "Say/[~1]@u1/c1", "--by", "Hello/1.2@u1/c1"];
            argv.extend_from_slice(args);
            let Commands::Resolve { update, no_update, .. } = Cli::try_parse_from(argv).unwrap().command else {
                panic!("expected resolve");
            };
            cli::flag_pair(update, no_update)
        };
        assert_eq!(parse(&[]), None);
        assert_eq!(parse(&["--update"]), Some(true));
        assert_eq!(parse(&["--no-update"]), Some(false));
        assert_eq!(parse(&["--update", "--no-update"]), Some(false));
        assert_eq!(parse(&["--no-update", "-u"]), Some(true));
    }

    #[test]
    fn test_satisfy_requires_versions() {
        assert!(Cli::try_parse_from(["depresolve", "satisfy", ">1.0"]).is_err());
    }
}
