//! VCS adapter trait

use musdex_fs::NormalizedPath;

use crate::{Manifest, Result};

/// Capability musdex needs from a version-control system.
///
/// All paths are relative to the working root the adapter was created for.
pub trait VcsAdapter {
    /// Short backend name, used in log output.
    fn name(&self) -> &str;

    /// Snapshot of the tracked paths at or below `scope`.
    ///
    /// Callers take this once per run; it is not refreshed as files are added.
    fn manifest(&self, scope: &NormalizedPath) -> Result<Manifest>;

    /// Start tracking `path`.
    fn add_file(&self, path: &NormalizedPath) -> Result<()>;
}
