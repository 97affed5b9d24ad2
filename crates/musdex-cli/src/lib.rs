//! musdex CLI
//!
//! Shared implementation of the `musdex` and `xedsum` binaries. They take
//! the same arguments and differ only in what a bare invocation does:
//! `musdex` extracts, `xedsum` combines.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

use std::path::Path;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

/// Command run when none is given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultCommand {
    Extract,
    Combine,
}

impl DefaultCommand {
    fn command(self) -> Commands {
        match self {
            Self::Extract => Commands::Extract {
                force: false,
                archives: Vec::new(),
            },
            Self::Combine => Commands::Combine {
                force: false,
                archives: Vec::new(),
            },
        }
    }
}

/// Parse the process arguments, run, and exit non-zero on a fatal error.
pub fn main(default: DefaultCommand) {
    if let Err(e) = run(Cli::parse(), default) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Run a parsed command line against the current directory.
pub fn run(cli: Cli, default: DefaultCommand) -> Result<()> {
    logging::init(cli.verbose, cli.quiet);

    let root = std::env::current_dir()?;
    let command = cli.command.unwrap_or_else(|| default.command());
    execute_command(&root, cli.config.as_deref(), command)
}

fn execute_command(root: &Path, config: Option<&Path>, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Add { archives, handler } => {
            commands::run_add(root, config, &archives, handler.as_deref())
        }
        Commands::Extract { force, archives } => {
            commands::run_extract(root, config, &archives, force)
        }
        Commands::Combine { force, archives } => {
            commands::run_combine(root, config, &archives, force)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_commands() {
        assert_eq!(
            DefaultCommand::Extract.command(),
            Commands::Extract {
                force: false,
                archives: vec![]
            }
        );
        assert_eq!(
            DefaultCommand::Combine.command(),
            Commands::Combine {
                force: false,
                archives: vec![]
            }
        );
    }

    #[test]
    fn test_cli_error_user() {
        let error = crate::error::CliError::user("test error");
        assert_eq!(format!("{}", error), "test error");
    }
}
