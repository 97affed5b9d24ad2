//! Git adapter backed by the git index

use std::path::{Path, PathBuf};

use git2::Repository;
use musdex_fs::NormalizedPath;

use crate::{Error, Manifest, Result, VcsAdapter};

/// Git adapter.
///
/// The manifest is read from the index (staged and committed paths alike),
/// and new paths are staged with `git add` semantics.
pub struct GitVcs {
    root: PathBuf,
    /// The working root expressed relative to the repository workdir
    prefix: NormalizedPath,
}

impl GitVcs {
    /// Open the repository containing `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let repo = Repository::discover(&root)?;
        let workdir = repo.workdir().ok_or_else(|| Error::BareRepository {
            path: repo.path().to_path_buf(),
        })?;

        let workdir = dunce::canonicalize(workdir).map_err(|e| musdex_fs::Error::io(workdir, e))?;
        let canonical_root =
            dunce::canonicalize(&root).map_err(|e| musdex_fs::Error::io(&root, e))?;
        let prefix = NormalizedPath::relative_to(&workdir, &canonical_root)?;

        Ok(Self { root, prefix })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn repository(&self) -> Result<Repository> {
        Ok(Repository::discover(&self.root)?)
    }
}

impl VcsAdapter for GitVcs {
    fn name(&self) -> &str {
        "git"
    }

    fn manifest(&self, scope: &NormalizedPath) -> Result<Manifest> {
        let repo = self.repository()?;
        let index = repo.index()?;

        let manifest = index
            .iter()
            .filter_map(|entry| {
                let path = NormalizedPath::new(String::from_utf8_lossy(&entry.path).as_ref());
                path.strip_dir(&self.prefix).map(NormalizedPath::new)
            })
            .filter(|path| path.is_within(scope))
            .collect();

        Ok(manifest)
    }

    fn add_file(&self, path: &NormalizedPath) -> Result<()> {
        let repo = self.repository()?;
        let mut index = repo.index()?;

        let in_repo = self.prefix.join(path.as_str());
        tracing::debug!(file = %in_repo, "Staging file in git index");
        index.add_path(in_repo.as_ref())?;
        index.write()?;

        Ok(())
    }
}
