//! Command implementations for musdex-cli

pub mod add;
pub mod reconcile;

pub use add::run_add;
pub use reconcile::{run_combine, run_extract};

use std::path::{Path, PathBuf};

use colored::Colorize;
use musdex_core::{RunReport, Session};
use musdex_fs::NormalizedPath;
use musdex_vcs::{VcsAdapter, VcsRegistry};

use crate::error::{CliError, Result};

/// Open the session for `root` and build the VCS adapter its config selects.
pub(crate) fn open(root: &Path, config: Option<&Path>) -> Result<(Session, Box<dyn VcsAdapter>)> {
    let session = Session::open_with(root, config)?;
    let vcs = VcsRegistry::create(root, &session.config().vcs_settings())?;
    tracing::debug!(vcs = vcs.name(), "Using VCS adapter");
    Ok((session, vcs))
}

/// Archive arguments as paths relative to `root`.
pub(crate) fn normalize_archives(root: &Path, archives: &[PathBuf]) -> Result<Vec<NormalizedPath>> {
    archives
        .iter()
        .map(|archive| {
            NormalizedPath::relative_to(root, archive).map_err(|e| match e {
                musdex_fs::Error::OutsideRoot { path, .. } => CliError::user(format!(
                    "Archive {} is outside the working directory {}",
                    path.display(),
                    root.display()
                )),
                other => other.into(),
            })
        })
        .collect()
}

/// Print the outcome of a run.
///
/// `verb` describes what happened to the reconciled files ("Extracted",
/// "Combined").
pub(crate) fn print_report(verb: &str, report: &RunReport) {
    for issue in &report.skipped {
        println!(
            "   {} {}: {}",
            "-".yellow(),
            issue.subject.as_str().cyan(),
            issue.error
        );
    }
    for issue in &report.failures {
        println!(
            "   {} {}: {}",
            "!".red(),
            issue.subject.as_str().cyan(),
            issue.error
        );
    }

    if report.is_noop() {
        println!("{} Everything is up to date.", "OK".green().bold());
        return;
    }

    let registered = if report.registered.is_empty() {
        String::new()
    } else {
        format!(", {} newly registered", report.registered.len())
    };
    println!(
        "{} {} {} file(s){}",
        "OK".green().bold(),
        verb,
        report.files.len(),
        registered
    );
}
