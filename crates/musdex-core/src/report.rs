//! Outcome of one add, extract or combine run

use musdex_archive::{Change, Reconciled};
use musdex_fs::NormalizedPath;

use crate::Error;

/// A problem confined to one archive or one file.
#[derive(Debug)]
pub struct Issue {
    /// Archive or file the problem concerns
    pub subject: NormalizedPath,
    pub error: Error,
}

/// What a run did.
///
/// `files` is the reconciliation result: every file written during
/// extraction or folded back during combine, in processing order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub files: Vec<Reconciled>,
    /// Paths newly registered with the VCS
    pub registered: Vec<NormalizedPath>,
    /// Archives passed over (already managed, or not understood)
    pub skipped: Vec<Issue>,
    /// Archives or files that failed while the run continued
    pub failures: Vec<Issue>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the run wrote nothing.
    pub fn is_noop(&self) -> bool {
        self.files.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Reconciled paths, in processing order.
    pub fn paths(&self) -> impl Iterator<Item = &NormalizedPath> {
        self.files.iter().map(|f| &f.path)
    }

    /// Number of reconciled files with the given change kind.
    pub fn count(&self, change: Change) -> usize {
        self.files.iter().filter(|f| f.change == change).count()
    }

    pub(crate) fn skip(&mut self, subject: NormalizedPath, error: Error) {
        self.skipped.push(Issue { subject, error });
    }

    pub(crate) fn fail(&mut self, subject: NormalizedPath, error: Error) {
        self.failures.push(Issue { subject, error });
    }
}
