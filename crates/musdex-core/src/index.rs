//! Timestamp index of everything musdex has materialized
//!
//! The index maps managed paths (extraction roots and extracted files) to
//! the timestamp they were last known at. It is musdex's own record and is
//! independent of what the VCS tracks.

use std::collections::BTreeMap;

use musdex_fs::{NormalizedPath, Timestamp};
use serde::{Deserialize, Serialize};

const INDEX_VERSION: &str = "1.0";

fn default_version() -> String {
    INDEX_VERSION.to_string()
}

/// Persisted `path -> timestamp` record.
///
/// Reads both the versioned document and the bare `path: timestamp` map
/// written by yaml-era trees; always writes the versioned document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "IndexDocument")]
pub struct Index {
    /// Index format version for forward compatibility
    version: String,
    entries: BTreeMap<NormalizedPath, Timestamp>,
    #[serde(skip)]
    dirty: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IndexDocument {
    Versioned {
        version: String,
        #[serde(default)]
        entries: BTreeMap<NormalizedPath, Timestamp>,
    },
    Flat(BTreeMap<NormalizedPath, Timestamp>),
}

impl From<IndexDocument> for Index {
    fn from(document: IndexDocument) -> Self {
        let (version, entries) = match document {
            IndexDocument::Versioned { version, entries } => (version, entries),
            IndexDocument::Flat(entries) => (default_version(), entries),
        };
        Self {
            version,
            entries,
            dirty: false,
        }
    }
}

impl Default for Index {
    fn default() -> Self {
        Self::new()
    }
}

impl Index {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            version: default_version(),
            entries: BTreeMap::new(),
            dirty: false,
        }
    }

    pub fn get(&self, path: &NormalizedPath) -> Option<Timestamp> {
        self.entries.get(path).copied()
    }

    /// Record `timestamp` for `path`.
    ///
    /// A recorded timestamp never moves backwards: an older value is
    /// ignored. Returns whether the index changed.
    pub fn record(&mut self, path: NormalizedPath, timestamp: Timestamp) -> bool {
        match self.entries.get(&path) {
            Some(existing) if *existing >= timestamp => false,
            _ => {
                self.entries.insert(path, timestamp);
                self.dirty = true;
                true
            }
        }
    }

    /// Entries at or below `dir`.
    pub fn within<'a>(
        &'a self,
        dir: &'a NormalizedPath,
    ) -> impl Iterator<Item = (&'a NormalizedPath, Timestamp)> {
        self.entries
            .iter()
            .filter(move |(path, _)| path.is_within(dir))
            .map(|(path, ts)| (path, *ts))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }
}
