//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Paths are compared as strings throughout musdex (index keys, VCS manifest
/// lines, archive filenames), so normalization also drops `.` segments,
/// repeated separators and trailing slashes. `..` segments are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str.replace('\\', "/")),
        }
    }

    /// Express `path` relative to `root`.
    ///
    /// Relative inputs are taken to be relative to `root` already and are only
    /// normalized. Absolute inputs must resolve to a location under `root`.
    pub fn relative_to(root: &Path, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_relative() {
            return Ok(Self::new(path));
        }

        let canonical_root = dunce::canonicalize(root).map_err(|e| Error::io(root, e))?;
        let canonical_path = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

        canonical_path
            .strip_prefix(&canonical_root)
            .map(Self::new)
            .map_err(|_| Error::OutsideRoot {
                path: path.to_path_buf(),
                root: root.to_path_buf(),
            })
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Resolve this path against a root directory for I/O.
    ///
    /// Absolute paths are returned unchanged.
    pub fn under(&self, root: &Path) -> PathBuf {
        let native = self.to_native();
        if native.is_absolute() {
            native
        } else {
            root.join(native)
        }
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        if self.inner == "." {
            return Self::new(segment);
        }
        Self {
            inner: clean(&format!("{}/{}", self.inner, segment.replace('\\', "/"))),
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) if idx > 0 => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        match self.inner.rsplit('/').next() {
            Some("") | Some(".") | None => None,
            Some(name) => Some(name),
        }
    }

    /// Whether this path is `dir` itself or lies beneath it.
    ///
    /// Matches whole components: `a/bc` is not under `a/b`.
    pub fn is_within(&self, dir: &NormalizedPath) -> bool {
        self.strip_dir(dir).is_some()
    }

    /// The remainder of this path below `dir`, if it lies beneath it.
    ///
    /// Returns an empty string when the paths are equal.
    pub fn strip_dir(&self, dir: &NormalizedPath) -> Option<&str> {
        if dir.inner == "." {
            return Some(&self.inner);
        }
        let rest = self.inner.strip_prefix(dir.inner.as_str())?;
        if rest.is_empty() {
            Some(rest)
        } else if dir.inner.ends_with('/') {
            Some(rest)
        } else {
            rest.strip_prefix('/')
        }
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

/// Collapse separators and `.` segments of a forward-slash path.
fn clean(path: &str) -> String {
    let absolute = path.starts_with('/');
    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    match (absolute, segments.is_empty()) {
        (true, _) => format!("/{}", segments.join("/")),
        (false, true) => ".".to_string(),
        (false, false) => segments.join("/"),
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

impl serde::Serialize for NormalizedPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.inner)
    }
}

impl<'de> serde::Deserialize<'de> for NormalizedPath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_drops_dot_segments_and_repeated_separators() {
        assert_eq!(clean("./a//b/./c/"), "a/b/c");
        assert_eq!(clean("/a//b"), "/a/b");
        assert_eq!(clean("./"), ".");
        assert_eq!(clean("../a"), "../a");
    }

    #[test]
    fn join_onto_current_dir_yields_segment() {
        let joined = NormalizedPath::new(".").join("a.zip");
        assert_eq!(joined.as_str(), "a.zip");
    }
}
