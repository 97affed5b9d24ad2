//! Shell adapter tests driving ordinary Unix commands through templates.
#![cfg(unix)]

use musdex_fs::NormalizedPath;
use musdex_vcs::{CommandTemplate, Error, ShellVcs, VcsAdapter};
use std::fs;
use tempfile::TempDir;

fn adapter(root: &std::path::Path, add: &str, show: &str) -> ShellVcs {
    ShellVcs::new(
        "test",
        root,
        CommandTemplate::new(add),
        CommandTemplate::new(show),
    )
}

#[test]
fn test_add_file_runs_template_in_root() {
    let temp = TempDir::new().unwrap();
    let vcs = adapter(temp.path(), r#"touch "%(file)s.tracked""#, "true");

    vcs.add_file(&NormalizedPath::new("content.xml")).unwrap();

    assert!(temp.path().join("content.xml.tracked").exists());
}

#[test]
fn test_manifest_parses_command_output() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("listing.txt"),
        ".\n./_musdex\n./_musdex/a.zip/content.xml\n./other/file\n",
    )
    .unwrap();
    let vcs = adapter(temp.path(), "true", "cat listing.txt");

    let manifest = vcs.manifest(&NormalizedPath::new("_musdex")).unwrap();

    assert_eq!(manifest.len(), 2);
    assert!(manifest.contains(&NormalizedPath::new("_musdex/a.zip/content.xml")));
    assert!(!manifest.contains(&NormalizedPath::new("other/file")));
}

#[test]
fn test_failing_command_reports_exit_code() {
    let temp = TempDir::new().unwrap();
    let vcs = adapter(temp.path(), "false", "true");

    let err = vcs.add_file(&NormalizedPath::new("a")).unwrap_err();
    assert!(matches!(err, Error::CommandFailed { code: 1, .. }));
}

#[test]
fn test_missing_program_is_spawn_error() {
    let temp = TempDir::new().unwrap();
    let vcs = adapter(temp.path(), "musdex-no-such-vcs add %(file)s", "true");

    let err = vcs.add_file(&NormalizedPath::new("a")).unwrap_err();
    assert!(matches!(err, Error::Spawn { .. }));
}
