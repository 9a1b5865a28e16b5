//! # ember-cli
//!
//! Command-line interface for the ember EVM.
//!
//! ## Usage
//!
//! ```bash
//! # Run a fixture file
//! ember run fixtures.json
//! ember run fixtures.json --filter CALL --fail-fast
//!
//! # Execute raw bytecode against an empty world
//! ember exec 0x6001600201
//! ember exec 0x600035 --calldata 0xff --json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::CliConfig;
pub use error::CliError;
pub use output::Output;

/// ember EVM CLI
#[derive(Parser, Debug)]
#[command(name = "ember")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ./ember.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level, used when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Run every fixture in a JSON file
    Run(commands::run::RunArgs),
    /// Execute raw bytecode
    Exec(commands::exec::ExecArgs),
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level);

    match cli.command {
        Commands::Run(args) => {
            if !args.execute(&config)? {
                std::process::exit(1);
            }
        }
        Commands::Exec(args) => args.execute(&config)?,
    }

    Ok(())
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
    fn test_parse_run() {
        let cli = Cli::parse_from(["ember", "run", "a.json", "--filter", "ADD", "--fail-fast"]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.file, PathBuf::from("a.json"));
                assert_eq!(args.filter.as_deref(), Some("ADD"));
                assert!(args.fail_fast);
                assert!(!args.json);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_exec() {
        let cli = Cli::parse_from([
            "ember",
            "exec",
            "0x6001",
            "--calldata",
            "0xff",
            "--address",
            "0xaa",
            "--json",
        ]);
        match cli.command {
            Commands::Exec(args) => {
                assert_eq!(args.code, "0x6001");
                assert_eq!(args.calldata.as_deref(), Some("0xff"));
                assert_eq!(args.address.as_deref(), Some("0xaa"));
                assert!(args.json);
            }
            _ => panic!("expected exec"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "ember",
            "exec",
            "00",
            "--log-level",
            "debug",
            "--config",
            "x.toml",
        ]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["ember"]).is_err());
    }
}
