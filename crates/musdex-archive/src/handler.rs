//! Archive handler trait and result types

use musdex_fs::{NormalizedPath, Timestamp};

use crate::{ArchiveContext, ExtractMode, Result};

/// One entry as declared by the container's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path inside the archive
    pub name: String,
    pub timestamp: Timestamp,
}

/// Why a file appears in a reconciliation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Extracted, and not yet known to the VCS
    Created,
    /// Extracted over a VCS-tracked path
    Updated,
    /// Folded back into the container
    Combined,
}

/// A file written (extracted) or rolled up (combined) during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub path: NormalizedPath,
    pub timestamp: Timestamp,
    pub change: Change,
}

impl Reconciled {
    pub fn new(path: NormalizedPath, timestamp: Timestamp, change: Change) -> Self {
        Self {
            path,
            timestamp,
            change,
        }
    }
}

/// Result of one handler extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOutcome {
    pub mode: ExtractMode,
    /// Files written, in container order
    pub files: Vec<Reconciled>,
}

impl ExtractOutcome {
    pub fn up_to_date() -> Self {
        Self {
            mode: ExtractMode::UpToDate,
            files: Vec::new(),
        }
    }

    /// Whether the extraction root should be stamped as freshly materialized.
    ///
    /// Full extractions always are; selective ones only if they wrote
    /// something.
    pub fn materialized(&self) -> bool {
        match self.mode {
            ExtractMode::Full => true,
            ExtractMode::Selective => !self.files.is_empty(),
            ExtractMode::UpToDate => false,
        }
    }
}

/// A container format musdex can extract and rebuild.
///
/// Implementations must be idempotent: extracting an unchanged container a
/// second time writes nothing, and combining an unchanged tree leaves the
/// container alone.
pub trait ArchiveHandler {
    /// Registry name, persisted in the config entry.
    fn name(&self) -> &'static str;

    /// Non-destructive test that this handler understands the container.
    fn check(&self, ctx: &ArchiveContext) -> bool;

    /// The container's entries, directories excluded.
    fn entries(&self, ctx: &ArchiveContext) -> Result<Vec<ArchiveEntry>>;

    /// Bring the extraction root up to date with the container.
    ///
    /// `force` extracts every entry regardless of index state.
    fn extract(&self, ctx: &ArchiveContext, force: bool) -> Result<ExtractOutcome>;

    /// Rebuild the container from the extraction root.
    ///
    /// `force` rewrites every file found on disk. Entries whose files were
    /// removed from the tree are kept.
    fn combine(&self, ctx: &ArchiveContext, force: bool) -> Result<Vec<Reconciled>>;
}
