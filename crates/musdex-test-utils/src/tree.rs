//! [`TestTree`] scratch working root for musdex scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use musdex_fs::Timestamp;
use tempfile::TempDir;

use crate::archive::touch;

/// A temporary working root with helper methods for test setup and
/// assertion.
///
/// # Example
///
/// ```rust,no_run
/// use musdex_test_utils::{TestTree, ZipFixture, at};
///
/// let tree = TestTree::new();
/// ZipFixture::new()
///     .file("content.xml", "<doc/>", at(12, 0, 0))
///     .write_to(&tree.path("doc.odt"));
/// tree.assert_file_exists("doc.odt");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` under the root.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write_file(&self, rel: &str, content: &str) {
        let full_path = self.path(rel);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }

    /// Write `content` to `rel` and set its modification time.
    pub fn write_file_at(&self, rel: &str, content: &str, modified: Timestamp) {
        self.write_file(rel, content);
        touch(&self.path(rel), modified);
    }

    pub fn read_file(&self, rel: &str) -> String {
        let full_path = self.path(rel);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Modification time of `rel`.
    pub fn modified(&self, rel: &str) -> Timestamp {
        Timestamp::modified(&self.path(rel)).unwrap()
    }

    /// Assert that `rel` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `rel` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `rel` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, rel: &str, content: &str) {
        let file_content = self.read_file(rel);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            rel,
            content,
            file_content
        );
    }
}
