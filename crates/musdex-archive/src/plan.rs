//! Format-independent reconciliation decisions
//!
//! Timestamps compare with strict greater-than everywhere: equal values mean
//! "unchanged", which is what makes repeated runs idempotent.

use musdex_fs::{NormalizedPath, Timestamp};

use crate::ArchiveContext;

/// How much of an archive an extraction has to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Never extracted, or forced: write every entry
    Full,
    /// Container changed since the last extraction: write new and newer entries
    Selective,
    /// Container unchanged: examine nothing
    UpToDate,
}

impl ExtractMode {
    /// Decide from the extraction root's index record and the container's
    /// modification time.
    pub fn decide(indexed_at: Option<Timestamp>, container_modified: Timestamp, force: bool) -> Self {
        match indexed_at {
            _ if force => Self::Full,
            None => Self::Full,
            Some(indexed) if container_modified > indexed => Self::Selective,
            Some(_) => Self::UpToDate,
        }
    }
}

/// What to do with one archive entry during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    /// Write it; the VCS does not know the path yet
    Create,
    /// Overwrite it; the VCS already tracks the path
    Update,
    Skip,
}

impl EntryAction {
    pub fn writes(self) -> bool {
        !matches!(self, Self::Skip)
    }
}

/// Decide the action for the entry materialized at `path` with archive
/// timestamp `timestamp`.
pub fn plan_entry(
    ctx: &ArchiveContext,
    mode: ExtractMode,
    path: &NormalizedPath,
    timestamp: Timestamp,
) -> EntryAction {
    let tracked = ctx.is_tracked(path);
    match mode {
        ExtractMode::UpToDate => EntryAction::Skip,
        ExtractMode::Full if tracked => EntryAction::Update,
        ExtractMode::Full => EntryAction::Create,
        ExtractMode::Selective if !tracked => EntryAction::Create,
        ExtractMode::Selective => match ctx.recorded(path) {
            None => EntryAction::Update,
            Some(recorded) if timestamp > recorded => EntryAction::Update,
            Some(_) => EntryAction::Skip,
        },
    }
}

/// What to do with one extracted file when rebuilding the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldAction {
    /// The container has no entry for it
    Add,
    /// The file is newer than the container's entry
    Replace,
    /// Copy the container's entry unchanged
    Keep,
}

impl FoldAction {
    pub fn writes(self) -> bool {
        !matches!(self, Self::Keep)
    }
}

/// Decide how a file on disk (modified at `on_disk`, already truncated to
/// archive resolution) folds into a container holding it at `in_archive`.
pub fn plan_fold(on_disk: Timestamp, in_archive: Option<Timestamp>, force: bool) -> FoldAction {
    match in_archive {
        None => FoldAction::Add,
        Some(_) if force => FoldAction::Replace,
        Some(archived) if on_disk > archived => FoldAction::Replace,
        Some(_) => FoldAction::Keep,
    }
}
