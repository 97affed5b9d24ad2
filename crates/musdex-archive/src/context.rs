//! What a handler needs to know about one managed archive

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use musdex_fs::{NormalizedPath, Timestamp};

/// Everything a handler needs to reconcile one archive.
///
/// Paths are relative to `root`. `tracked` and `recorded` are restricted to
/// the extraction location.
#[derive(Debug, Clone)]
pub struct ArchiveContext {
    /// Working root all relative paths are resolved against
    pub root: PathBuf,
    /// The archive container
    pub archive: NormalizedPath,
    /// Directory the archive's entries are extracted under
    pub location: NormalizedPath,
    /// When the extraction root was last materialized, if ever
    pub indexed_at: Option<Timestamp>,
    /// Paths below `location` the VCS tracked at the start of the run
    pub tracked: BTreeSet<NormalizedPath>,
    /// Index timestamps for paths below `location`
    pub recorded: BTreeMap<NormalizedPath, Timestamp>,
}

impl ArchiveContext {
    /// Context for an archive that has never been indexed or tracked.
    pub fn new(root: impl Into<PathBuf>, archive: NormalizedPath, location: NormalizedPath) -> Self {
        Self {
            root: root.into(),
            archive,
            location,
            indexed_at: None,
            tracked: BTreeSet::new(),
            recorded: BTreeMap::new(),
        }
    }

    pub fn with_indexed_at(mut self, indexed_at: Option<Timestamp>) -> Self {
        self.indexed_at = indexed_at;
        self
    }

    pub fn with_tracked(mut self, tracked: impl IntoIterator<Item = NormalizedPath>) -> Self {
        self.tracked = tracked.into_iter().collect();
        self
    }

    pub fn with_recorded(
        mut self,
        recorded: impl IntoIterator<Item = (NormalizedPath, Timestamp)>,
    ) -> Self {
        self.recorded = recorded.into_iter().collect();
        self
    }

    /// Filesystem path of the container.
    pub fn container_path(&self) -> PathBuf {
        self.archive.under(&self.root)
    }

    /// Filesystem path of the extraction root.
    pub fn location_path(&self) -> PathBuf {
        self.location.under(&self.root)
    }

    /// Managed path of an archive entry.
    pub fn entry_path(&self, name: &str) -> NormalizedPath {
        self.location.join(name)
    }

    /// Filesystem path of a managed path.
    pub fn resolve(&self, path: &NormalizedPath) -> PathBuf {
        path.under(&self.root)
    }

    pub fn is_tracked(&self, path: &NormalizedPath) -> bool {
        self.tracked.contains(path)
    }

    pub fn recorded(&self, path: &NormalizedPath) -> Option<Timestamp> {
        self.recorded.get(path).copied()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
