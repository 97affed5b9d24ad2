//! Add command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;
use musdex_archive::HandlerRegistry;
use musdex_core::Engine;

use super::{normalize_archives, open, print_report};
use crate::error::Result;

/// Run the add command
///
/// Extracts each archive for the first time and records it in the config.
pub fn run_add(
    root: &Path,
    config: Option<&Path>,
    archives: &[PathBuf],
    handler: Option<&str>,
) -> Result<()> {
    println!("{} Adding {} archive(s)...", "=>".blue().bold(), archives.len());

    let archives = normalize_archives(root, archives)?;
    let (mut session, vcs) = open(root, config)?;
    let handlers = HandlerRegistry::new();

    let report = Engine::new(&handlers, vcs.as_ref()).add(&mut session, &archives, handler)?;
    session.finish(vcs.as_ref())?;

    print_report("Extracted", &report);
    Ok(())
}
