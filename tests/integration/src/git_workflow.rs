//! Full add / extract / combine lifecycle against a real git repository

use std::fs;

use musdex_archive::{Change, HandlerRegistry};
use musdex_core::{Engine, RunReport, Session};
use musdex_fs::NormalizedPath;
use musdex_test_utils::git::{git_repo_tracking, real_git_repo, staged_paths};
use musdex_test_utils::{TestTree, ZipFixture, at, from_now, read_entries, read_entry};
use musdex_vcs::{VcsAdapter, VcsRegistry};
use pretty_assertions::assert_eq;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// One musdex invocation: open, run, finish.
fn invoke<F>(tree: &TestTree, action: F) -> RunReport
where
    F: FnOnce(&Engine, &mut Session) -> musdex_core::Result<RunReport>,
{
    let mut session = Session::open(tree.root()).unwrap();
    let vcs = VcsRegistry::create(tree.root(), &session.config().vcs_settings()).unwrap();
    let handlers = HandlerRegistry::new();
    let report = action(&Engine::new(&handlers, vcs.as_ref()), &mut session).unwrap();
    session.finish(vcs.as_ref()).unwrap();
    report
}

fn add(tree: &TestTree, name: &str) -> RunReport {
    invoke(tree, |engine, session| {
        engine.add(session, &[NormalizedPath::new(name)], None)
    })
}

fn extract(tree: &TestTree) -> RunReport {
    invoke(tree, |engine, session| engine.extract(session, &[], false))
}

fn combine(tree: &TestTree) -> RunReport {
    invoke(tree, |engine, session| engine.combine(session, &[], false))
}

fn git_tree() -> (TestTree, git2::Repository) {
    let tree = TestTree::new();
    let repo = real_git_repo(tree.root());
    tree.write_file("_musdex/musdex.toml", "vcs = \"git\"\n");
    ZipFixture::new()
        .dir("META-INF/")
        .file("META-INF/manifest.xml", "<manifest/>", at(12, 0, 0))
        .file("content.xml", "<doc>v1</doc>", at(12, 0, 0))
        .file("styles.xml", "<styles/>", at(12, 0, 0))
        .write_to(&tree.path("report.odt"));
    (tree, repo)
}

fn staged(repo: &git2::Repository) -> Vec<String> {
    let mut paths = staged_paths(repo);
    paths.sort();
    paths
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn add_stages_every_extracted_file() {
    let (tree, repo) = git_tree();

    let report = add(&tree, "report.odt");

    assert_eq!(report.files.len(), 3);
    assert_eq!(
        staged(&repo),
        vec![
            "_musdex/report.odt/META-INF/manifest.xml",
            "_musdex/report.odt/content.xml",
            "_musdex/report.odt/styles.xml",
        ]
    );
}

#[test]
fn add_then_extract_is_empty() {
    let (tree, _repo) = git_tree();
    add(&tree, "report.odt");

    assert!(extract(&tree).is_noop());
    assert!(extract(&tree).is_noop());
}

#[test]
fn updated_archive_extracts_only_changes_and_registers_new_files_once() {
    let (tree, repo) = git_tree();
    add(&tree, "report.odt");

    ZipFixture::new()
        .dir("META-INF/")
        .file("META-INF/manifest.xml", "<manifest/>", at(12, 0, 0))
        .file("content.xml", "<doc>v2</doc>", at(12, 30, 0))
        .file("styles.xml", "<styles/>", at(12, 0, 0))
        .file("Pictures/logo.png", "png", at(12, 30, 0))
        .write_with_mtime(&tree.path("report.odt"), from_now(2));

    let report = extract(&tree);

    let mut changes: Vec<(String, Change)> = report
        .files
        .iter()
        .map(|f| (f.path.as_str().to_string(), f.change))
        .collect();
    changes.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        changes,
        vec![
            ("_musdex/report.odt/Pictures/logo.png".to_string(), Change::Created),
            ("_musdex/report.odt/content.xml".to_string(), Change::Updated),
        ]
    );
    assert_eq!(
        report.registered,
        vec![NormalizedPath::new("_musdex/report.odt/Pictures/logo.png")]
    );
    assert!(staged(&repo).contains(&"_musdex/report.odt/Pictures/logo.png".to_string()));
    tree.assert_file_contains("_musdex/report.odt/content.xml", "v2");

    assert!(extract(&tree).is_noop());
}

#[test]
fn extract_then_combine_keeps_entry_set() {
    let (tree, _repo) = git_tree();
    let before = read_entries(&tree.path("report.odt"));
    add(&tree, "report.odt");

    assert!(combine(&tree).is_noop());
    assert_eq!(read_entries(&tree.path("report.odt")), before);
}

#[test]
fn edit_combine_extract_cycle() {
    let (tree, _repo) = git_tree();
    add(&tree, "report.odt");

    tree.write_file_at("_musdex/report.odt/content.xml", "<doc>edited</doc>", at(15, 0, 0));
    let report = combine(&tree);

    assert_eq!(report.files.len(), 1);
    assert_eq!(read_entry(&tree.path("report.odt"), "content.xml"), "<doc>edited</doc>");
    assert_eq!(read_entry(&tree.path("report.odt"), "styles.xml"), "<styles/>");

    assert!(extract(&tree).is_noop());
    assert!(combine(&tree).is_noop());
}

#[test]
fn fresh_checkout_rebuilds_archive_from_tree() {
    let (tree, _repo) = git_tree();
    add(&tree, "report.odt");

    // A clone carries the config and the extracted tree but neither the
    // index nor the container.
    fs::remove_file(tree.path("_musdex/.musdex.index.toml")).unwrap();
    fs::remove_file(tree.path("report.odt")).unwrap();

    let report = combine(&tree);

    assert_eq!(report.files.len(), 3);
    assert_eq!(read_entry(&tree.path("report.odt"), "content.xml"), "<doc>v1</doc>");
    assert!(extract(&tree).is_noop());
}

#[test]
fn git_adapter_sees_registrations_in_next_run() {
    let (tree, _repo) = git_tree();
    add(&tree, "report.odt");

    let vcs = VcsRegistry::create(
        tree.root(),
        &Session::open(tree.root()).unwrap().config().vcs_settings(),
    )
    .unwrap();
    let manifest = vcs.manifest(&NormalizedPath::new("_musdex")).unwrap();

    assert_eq!(manifest.len(), 3);
    assert!(manifest.contains(&NormalizedPath::new("_musdex/report.odt/content.xml")));
}

#[test]
fn paths_already_in_git_are_not_registered_again() {
    let tree = TestTree::new();
    git_repo_tracking(tree.root(), &["_musdex/report.odt/content.xml"]);
    tree.write_file("_musdex/musdex.toml", "vcs = \"git\"\n");
    ZipFixture::new()
        .file("content.xml", "<doc/>", at(12, 0, 0))
        .file("styles.xml", "<styles/>", at(12, 0, 0))
        .write_to(&tree.path("report.odt"));

    let report = add(&tree, "report.odt");

    assert_eq!(report.count(Change::Updated), 1);
    assert_eq!(
        report.registered,
        vec![NormalizedPath::new("_musdex/report.odt/styles.xml")]
    );
}
