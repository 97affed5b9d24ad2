//! Lifecycle driven through command templates, the way a darcs (or any
//! other command-line VCS) setup runs.
#![cfg(unix)]

use musdex_archive::HandlerRegistry;
use musdex_core::{Engine, Error, RunReport, Session};
use musdex_fs::NormalizedPath;
use musdex_test_utils::{TestTree, ZipFixture, at, from_now};
use musdex_vcs::VcsRegistry;
use pretty_assertions::assert_eq;

/// Config whose "VCS" appends registered paths to `tracked.txt` and lists
/// that file as the manifest.
const LEDGER_VCS: &str = r#"
vcs = "ledger"
vcs_add = "sh -c 'echo \"$0\" >> tracked.txt' %(file)s"
vcs_show_files = "sh -c 'cat tracked.txt 2>/dev/null; true' %(archive)s"
"#;

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

fn tracked_lines(tree: &TestTree) -> Vec<String> {
    tree.read_file("tracked.txt")
        .lines()
        .map(str::to_string)
        .collect()
}

fn ledger_tree() -> TestTree {
    let tree = TestTree::new();
    tree.write_file("_musdex/musdex.toml", LEDGER_VCS);
    ZipFixture::new()
        .file("a.xml", "alpha", at(12, 0, 0))
        .file("b.xml", "beta", at(12, 0, 0))
        .write_to(&tree.path("doc.zip"));
    tree
}

#[test]
fn templates_register_each_path_exactly_once_across_runs() {
    let tree = ledger_tree();

    invoke(&tree, |engine, session| {
        engine.add(session, &[NormalizedPath::new("doc.zip")], None)
    });
    assert_eq!(
        tracked_lines(&tree),
        vec!["_musdex/doc.zip/a.xml", "_musdex/doc.zip/b.xml"]
    );

    // Forced re-extraction rewrites every file but registers nothing new.
    let report = invoke(&tree, |engine, session| engine.extract(session, &[], true));
    assert_eq!(report.files.len(), 2);
    assert!(report.registered.is_empty());

    ZipFixture::new()
        .file("a.xml", "alpha", at(12, 0, 0))
        .file("b.xml", "beta", at(12, 0, 0))
        .file("c.xml", "gamma", at(12, 0, 0))
        .write_with_mtime(&tree.path("doc.zip"), from_now(2));
    invoke(&tree, |engine, session| engine.extract(session, &[], false));

    assert_eq!(
        tracked_lines(&tree),
        vec![
            "_musdex/doc.zip/a.xml",
            "_musdex/doc.zip/b.xml",
            "_musdex/doc.zip/c.xml",
        ]
    );
}

#[test]
fn failing_add_command_is_reported_per_file() {
    let tree = TestTree::new();
    tree.write_file(
        "_musdex/musdex.toml",
        "vcs_add = \"false %(file)s\"\nvcs_show_files = \"true %(archive)s\"\n",
    );
    ZipFixture::new()
        .file("a.xml", "alpha", at(12, 0, 0))
        .write_to(&tree.path("doc.zip"));

    let report = invoke(&tree, |engine, session| {
        engine.add(session, &[NormalizedPath::new("doc.zip")], None)
    });

    assert_eq!(report.files.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0].error,
        Error::VcsRegistration { .. }
    ));
    tree.assert_file_exists("_musdex/doc.zip/a.xml");

    let session = Session::open(tree.root()).unwrap();
    assert!(session.config().contains(&NormalizedPath::new("doc.zip")));
}

#[test]
fn failing_manifest_command_aborts_before_any_change() {
    let tree = TestTree::new();
    tree.write_file(
        "_musdex/musdex.toml",
        "vcs_add = \"true %(file)s\"\nvcs_show_files = \"false %(archive)s\"\n",
    );
    ZipFixture::new()
        .file("a.xml", "alpha", at(12, 0, 0))
        .write_to(&tree.path("doc.zip"));

    let mut session = Session::open(tree.root()).unwrap();
    let vcs = VcsRegistry::create(tree.root(), &session.config().vcs_settings()).unwrap();
    let handlers = HandlerRegistry::new();
    let result = Engine::new(&handlers, vcs.as_ref()).add(
        &mut session,
        &[NormalizedPath::new("doc.zip")],
        None,
    );

    assert!(matches!(result, Err(Error::Vcs(_))));
    tree.assert_file_not_exists("_musdex/doc.zip/a.xml");
}
