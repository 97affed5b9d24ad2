//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// musdex - keep archives and their extracted, version-controlled contents in sync
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of _musdex/musdex.toml
    #[arg(short, long, global = true, value_name = "FILE", env = "MUSDEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only report warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Put archives under management
    ///
    /// Each archive is fully extracted under _musdex/<archive>/, the
    /// extracted files are registered with the VCS, and the archive is
    /// recorded in the config.
    ///
    /// Examples:
    ///   musdex add report.odt
    ///   musdex add --handler zip slides.pptx data.xlsx
    Add {
        /// Archives to add
        #[arg(required = true, value_name = "ARCHIVE")]
        archives: Vec<PathBuf>,

        /// Archive handler to use (default: zip)
        #[arg(long)]
        handler: Option<String>,
    },

    /// Extract managed archives that changed since the last extraction
    Extract {
        /// Extract every entry, even from unchanged archives
        #[arg(short, long)]
        force: bool,

        /// Limit to these archives (default: all managed archives)
        #[arg(value_name = "ARCHIVE")]
        archives: Vec<PathBuf>,
    },

    /// Rebuild managed archives from their edited, extracted files
    Combine {
        /// Rewrite every extracted file, even unchanged ones
        #[arg(short, long)]
        force: bool,

        /// Limit to these archives (default: all managed archives)
        #[arg(value_name = "ARCHIVE")]
        archives: Vec<PathBuf>,
    },
}
