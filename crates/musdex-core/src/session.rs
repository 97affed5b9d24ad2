//! Scoped load and persist of the config and index for one run

use std::path::{Path, PathBuf};

use musdex_fs::{ConfigStore, ManagedPath, NormalizedPath};
use musdex_vcs::VcsAdapter;

use crate::{Config, Error, Index, Result};

/// Config and index loaded for the duration of one run.
///
/// Both documents are read once when the session opens and written back
/// once by [`Session::finish`], and only if something changed. A session
/// dropped without `finish` still writes pending changes, logging rather
/// than returning any failure.
pub struct Session {
    root: PathBuf,
    config_path: PathBuf,
    index_path: PathBuf,
    store: ConfigStore,
    config: Config,
    index: Index,
    config_existed: bool,
    finished: bool,
}

impl Session {
    /// Open the session for `root` using the default config location.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(root, None)
    }

    /// Open the session for `root`, reading the config from `config_path`
    /// (relative paths are taken from `root`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the config or index exists but cannot be
    /// parsed. Missing files yield empty documents.
    pub fn open_with(root: impl Into<PathBuf>, config_path: Option<&Path>) -> Result<Self> {
        let root = root.into();
        let config_path = match config_path {
            Some(path) => root.join(path),
            None => ManagedPath::Config.locate(&root, ManagedPath::YamlConfig),
        };
        let store = ConfigStore::new();

        let config_existed = config_path.exists();
        let config: Config = store
            .load_or_default(&config_path)
            .map_err(|source| Error::Config {
                path: config_path.clone(),
                source,
            })?;

        let index_path = config.index_path(&root);
        let index: Index = store
            .load_or_default(&index_path)
            .map_err(|source| Error::Config {
                path: index_path.clone(),
                source,
            })?;

        tracing::debug!(
            config = %config_path.display(),
            archives = config.archives.len(),
            indexed = index.len(),
            "Session opened"
        );

        Ok(Self {
            root,
            config_path,
            index_path,
            store,
            config,
            index,
            config_existed,
            finished: false,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut Index {
        &mut self.index
    }

    /// Whether either document has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.config.is_dirty() || self.index.is_dirty()
    }

    /// Persist pending changes and close the session.
    ///
    /// A config file written for the first time is registered with `vcs`;
    /// a registration failure is logged, not returned.
    pub fn finish(mut self, vcs: &dyn VcsAdapter) -> Result<()> {
        let result = self.persist(Some(vcs));
        self.finished = true;
        result
    }

    fn persist(&mut self, vcs: Option<&dyn VcsAdapter>) -> Result<()> {
        if self.index.is_dirty() {
            self.store.save(&self.index_path, &self.index)?;
            self.index.mark_clean();
            tracing::debug!(path = %self.index_path.display(), "Index saved");
        }

        if self.config.is_dirty() {
            self.store.save(&self.config_path, &self.config)?;
            self.config.mark_clean();
            tracing::debug!(path = %self.config_path.display(), "Config saved");

            if !self.config_existed {
                self.config_existed = true;
                if let Some(vcs) = vcs {
                    self.register_config(vcs);
                }
            }
        }

        Ok(())
    }

    fn register_config(&self, vcs: &dyn VcsAdapter) {
        let path = match NormalizedPath::relative_to(&self.root, &self.config_path) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "Config file is outside the working root, not registering");
                return;
            }
        };

        match vcs.add_file(&path) {
            Ok(()) => tracing::info!(file = %path, "Registered config with VCS"),
            Err(e) => tracing::warn!(file = %path, error = %e, "Failed to register config with VCS"),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.finished || !self.is_dirty() {
            return;
        }
        tracing::debug!("Session dropped with unsaved changes, persisting");
        if let Err(e) = self.persist(None) {
            tracing::error!(error = %e, "Failed to persist musdex state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArchiveConfig;
    use musdex_test_utils::{RecordingVcs, TestTree, at};
    use rstest::rstest;

    #[test]
    fn open_missing_files_yields_empty_documents() {
        let tree = TestTree::new();
        let session = Session::open(tree.root()).unwrap();
        assert!(session.config().archives.is_empty());
        assert!(session.index().is_empty());
        assert!(!session.is_dirty());
    }

    #[test]
    fn clean_session_writes_nothing() {
        let tree = TestTree::new();
        let vcs = RecordingVcs::new();
        Session::open(tree.root()).unwrap().finish(&vcs).unwrap();
        tree.assert_file_not_exists("_musdex/musdex.toml");
        tree.assert_file_not_exists("_musdex/.musdex.index.toml");
    }

    #[test]
    fn unparsable_config_is_fatal() {
        let tree = TestTree::new();
        tree.write_file("_musdex/musdex.toml", "archives = [[[");
        let err = Session::open(tree.root()).err().unwrap();
        assert!(matches!(err, Error::Config { .. }), "got {err:?}");
    }

    #[test]
    fn unparsable_index_is_fatal() {
        let tree = TestTree::new();
        tree.write_file("_musdex/.musdex.index.toml", "entries = 3");
        let err = Session::open(tree.root()).err().unwrap();
        assert!(matches!(err, Error::Config { .. }), "got {err:?}");
    }

    #[test]
    fn first_config_save_registers_config() {
        let tree = TestTree::new();
        let vcs = RecordingVcs::new();

        let mut session = Session::open(tree.root()).unwrap();
        session
            .config_mut()
            .push(ArchiveConfig::new("a.zip".into(), None));
        session.finish(&vcs).unwrap();

        tree.assert_file_contains("_musdex/musdex.toml", "a.zip");
        assert_eq!(vcs.added_strs(), vec!["_musdex/musdex.toml"]);

        let mut session = Session::open(tree.root()).unwrap();
        session
            .config_mut()
            .push(ArchiveConfig::new("b.zip".into(), None));
        session.finish(&vcs).unwrap();

        assert_eq!(vcs.added().len(), 1);
    }

    #[test]
    fn config_registration_failure_is_not_fatal() {
        let tree = TestTree::new();
        let vcs = RecordingVcs::new().failing_on("_musdex/musdex.toml");

        let mut session = Session::open(tree.root()).unwrap();
        session
            .config_mut()
            .push(ArchiveConfig::new("a.zip".into(), None));

        assert!(session.finish(&vcs).is_ok());
        tree.assert_file_exists("_musdex/musdex.toml");
    }

    #[test]
    fn index_override_is_honoured() {
        let tree = TestTree::new();
        tree.write_file("_musdex/musdex.toml", "index = \"state/index.json\"\n");
        let vcs = RecordingVcs::new();

        let mut session = Session::open(tree.root()).unwrap();
        session.index_mut().record("_musdex/a.zip".into(), at(12, 0, 0));
        session.finish(&vcs).unwrap();

        tree.assert_file_contains("state/index.json", "_musdex/a.zip");
        tree.assert_file_not_exists("_musdex/.musdex.index.toml");
    }

    #[test]
    fn drop_persists_pending_changes() {
        let tree = TestTree::new();
        {
            let mut session = Session::open(tree.root()).unwrap();
            session.index_mut().record("_musdex/a.zip".into(), at(12, 0, 0));
        }
        let session = Session::open(tree.root()).unwrap();
        assert_eq!(session.index().get(&"_musdex/a.zip".into()), Some(at(12, 0, 0)));
    }

    #[test]
    fn explicit_config_path_is_used() {
        let tree = TestTree::new();
        let vcs = RecordingVcs::new();

        let mut session = Session::open_with(tree.root(), Some(Path::new("musdex.yaml"))).unwrap();
        session
            .config_mut()
            .push(ArchiveConfig::new("a.zip".into(), None));
        session.finish(&vcs).unwrap();

        tree.assert_file_contains("musdex.yaml", "filename: a.zip");
        assert_eq!(vcs.added_strs(), vec!["musdex.yaml"]);
    }

    #[test]
    fn yaml_era_tree_is_picked_up() {
        let tree = TestTree::new();
        tree.write_file("_musdex/musdex.yaml", "archives:\n- {filename: a.zip}\n");
        tree.write_file(
            "_musdex/.musdex.index.yaml",
            "_musdex/a.zip: 2010-03-02 12:00:00\n_musdex/a.zip/x.xml: 2010-03-02 12:00:00\n",
        );
        let vcs = RecordingVcs::new();

        let mut session = Session::open(tree.root()).unwrap();
        assert!(session.config().contains(&"a.zip".into()));
        assert_eq!(session.index().get(&"_musdex/a.zip".into()), Some(at(12, 0, 0)));

        session
            .config_mut()
            .push(ArchiveConfig::new("b.zip".into(), None));
        session.index_mut().record("_musdex/b.zip".into(), at(13, 0, 0));
        session.finish(&vcs).unwrap();

        tree.assert_file_contains("_musdex/musdex.yaml", "b.zip");
        tree.assert_file_contains("_musdex/.musdex.index.yaml", "_musdex/b.zip");
        tree.assert_file_not_exists("_musdex/musdex.toml");
        tree.assert_file_not_exists("_musdex/.musdex.index.toml");
        assert!(vcs.added().is_empty());
    }

    #[rstest]
    #[case("musdex.toml")]
    #[case("musdex.json")]
    #[case("musdex.yml")]
    fn config_round_trips_in_every_format(#[case] name: &str) {
        let tree = TestTree::new();
        let vcs = RecordingVcs::new();

        let mut session = Session::open_with(tree.root(), Some(Path::new(name))).unwrap();
        session
            .config_mut()
            .push(ArchiveConfig::new("docs/a.odt".into(), Some("zip".into())));
        session.finish(&vcs).unwrap();

        let session = Session::open_with(tree.root(), Some(Path::new(name))).unwrap();
        assert_eq!(
            session.config().find(&"docs/a.odt".into()),
            Some(&ArchiveConfig::new("docs/a.odt".into(), Some("zip".into())))
        );
    }
}
