//! Extract and combine command implementations

use std::path::{Path, PathBuf};

use colored::Colorize;
use musdex_archive::HandlerRegistry;
use musdex_core::Engine;

use super::{normalize_archives, open, print_report};
use crate::error::Result;

/// Run the extract command
///
/// Brings extracted trees up to date with their archives.
pub fn run_extract(root: &Path, config: Option<&Path>, archives: &[PathBuf], force: bool) -> Result<()> {
    println!("{} Extracting archives...", "=>".blue().bold());

    let filter = normalize_archives(root, archives)?;
    let (mut session, vcs) = open(root, config)?;
    let handlers = HandlerRegistry::new();

    let report = Engine::new(&handlers, vcs.as_ref()).extract(&mut session, &filter, force)?;
    session.finish(vcs.as_ref())?;

    print_report("Extracted", &report);
    Ok(())
}

/// Run the combine command
///
/// Rebuilds archives from their edited extracted trees.
pub fn run_combine(root: &Path, config: Option<&Path>, archives: &[PathBuf], force: bool) -> Result<()> {
    println!("{} Combining archives...", "=>".blue().bold());

    let filter = normalize_archives(root, archives)?;
    let (mut session, vcs) = open(root, config)?;
    let handlers = HandlerRegistry::new();

    let report = Engine::new(&handlers, vcs.as_ref()).combine(&mut session, &filter, force)?;
    session.finish(vcs.as_ref())?;

    print_report("Combined", &report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::run_add;
    use musdex_test_utils::{TestTree, ZipFixture, at, git::real_git_repo, read_entry};

    fn git_tree() -> TestTree {
        let tree = TestTree::new();
        real_git_repo(tree.root());
        tree.write_file("_musdex/musdex.toml", "vcs = \"git\"\n");
        ZipFixture::new()
            .file("content.xml", "<doc/>", at(12, 0, 0))
            .write_to(&tree.path("doc.odt"));
        tree
    }

    #[test]
    fn test_add_then_extract() {
        let tree = git_tree();

        run_add(tree.root(), None, &["doc.odt".into()], None).unwrap();
        tree.assert_file_contains("_musdex/doc.odt/content.xml", "<doc/>");
        tree.assert_file_contains("_musdex/musdex.toml", "doc.odt");

        assert!(run_extract(tree.root(), None, &[], false).is_ok());
    }

    #[test]
    fn test_combine_after_edit() {
        let tree = git_tree();
        run_add(tree.root(), None, &["doc.odt".into()], None).unwrap();
        tree.write_file_at("_musdex/doc.odt/content.xml", "<doc>edited</doc>", at(13, 0, 0));

        run_combine(tree.root(), None, &[], false).unwrap();

        assert_eq!(read_entry(&tree.path("doc.odt"), "content.xml"), "<doc>edited</doc>");
    }

    #[test]
    fn test_absolute_archive_argument() {
        let tree = git_tree();
        let absolute = tree.path("doc.odt");

        run_add(tree.root(), None, &[absolute], None).unwrap();

        tree.assert_file_contains("_musdex/musdex.toml", "filename = \"doc.odt\"");
    }

    #[test]
    fn test_unknown_vcs_is_fatal() {
        let tree = TestTree::new();
        tree.write_file("_musdex/musdex.toml", "vcs = \"svn\"\n");

        let err = run_extract(tree.root(), None, &[], false).unwrap_err();
        assert!(err.to_string().contains("svn"));
    }
}
