//! In-memory VCS adapter that records what the engine asks of it.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use musdex_fs::NormalizedPath;
use musdex_vcs::{Error, Manifest, Result, VcsAdapter};

/// A [`VcsAdapter`] backed by an in-memory set of tracked paths.
///
/// Successful registrations are added to the tracked set, so a later
/// `manifest` call sees them, just like a real VCS would.
#[derive(Debug, Default)]
pub struct RecordingVcs {
    tracked: RefCell<BTreeSet<NormalizedPath>>,
    added: RefCell<Vec<NormalizedPath>>,
    failing: BTreeSet<NormalizedPath>,
    manifest_calls: Cell<usize>,
}

impl RecordingVcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `paths` already tracked.
    pub fn tracking<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<NormalizedPath>,
    {
        let vcs = Self::new();
        vcs.tracked
            .borrow_mut()
            .extend(paths.into_iter().map(Into::into));
        vcs
    }

    /// Make registration of `path` fail.
    pub fn failing_on(mut self, path: impl Into<NormalizedPath>) -> Self {
        self.failing.insert(path.into());
        self
    }

    /// Every successful `add_file` call, in order.
    pub fn added(&self) -> Vec<NormalizedPath> {
        self.added.borrow().clone()
    }

    /// `added` as plain strings, for terse assertions.
    pub fn added_strs(&self) -> Vec<String> {
        self.added
            .borrow()
            .iter()
            .map(|p| p.as_str().to_string())
            .collect()
    }

    pub fn is_tracked(&self, path: &str) -> bool {
        self.tracked.borrow().contains(&NormalizedPath::new(path))
    }

    pub fn manifest_calls(&self) -> usize {
        self.manifest_calls.get()
    }
}

impl VcsAdapter for RecordingVcs {
    fn name(&self) -> &str {
        "recording"
    }

    fn manifest(&self, scope: &NormalizedPath) -> Result<Manifest> {
        self.manifest_calls.set(self.manifest_calls.get() + 1);
        Ok(self
            .tracked
            .borrow()
            .iter()
            .filter(|p| p.is_within(scope))
            .cloned()
            .collect())
    }

    fn add_file(&self, path: &NormalizedPath) -> Result<()> {
        if self.failing.contains(path) {
            return Err(Error::CommandFailed {
                command: format!("record add {path}"),
                code: 1,
                stderr: "refused by test".to_string(),
            });
        }
        self.tracked.borrow_mut().insert(path.clone());
        self.added.borrow_mut().push(path.clone());
        Ok(())
    }
}
