//! Git repository fixtures.

use std::fs;
use std::path::Path;

/// Initialises a real git repository using `git2` (no initial commit).
///
/// Use for: tests that drive the git adapter against an empty index.
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Initialises a real git repository whose index already tracks `files`.
///
/// Each file is written with placeholder content before being staged.
///
/// # Panics
/// Panics if any filesystem or git operation fails.
pub fn git_repo_tracking(path: &Path, files: &[&str]) -> git2::Repository {
    let repo = real_git_repo(path);
    {
        let mut index = repo
            .index()
            .unwrap_or_else(|e| panic!("git_repo_tracking: failed to open index: {e}"));
        for file in files {
            let full = path.join(file);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap_or_else(|e| {
                    panic!("git_repo_tracking: failed to create {}: {e}", parent.display())
                });
            }
            fs::write(&full, file.as_bytes())
                .unwrap_or_else(|e| panic!("git_repo_tracking: failed to write {file}: {e}"));
            index
                .add_path(Path::new(file))
                .unwrap_or_else(|e| panic!("git_repo_tracking: failed to stage {file}: {e}"));
        }
        index
            .write()
            .unwrap_or_else(|e| panic!("git_repo_tracking: failed to write index: {e}"));
    }
    repo
}

/// Paths currently staged in the repository's index.
pub fn staged_paths(repo: &git2::Repository) -> Vec<String> {
    let index = repo
        .index()
        .unwrap_or_else(|e| panic!("staged_paths: failed to open index: {e}"));
    index
        .iter()
        .map(|entry| String::from_utf8_lossy(&entry.path).into_owned())
        .collect()
}
