//! Tracked-path snapshots

use std::collections::BTreeSet;

use musdex_fs::NormalizedPath;

/// The set of paths a VCS tracks, as of the moment it was queried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    paths: BTreeSet<NormalizedPath>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse line-oriented command output, one path per line.
    ///
    /// Blank lines are dropped and every line is normalized, so `./a/b`
    /// and `a/b` are the same entry. Paths containing newlines cannot be
    /// represented.
    pub fn from_lines(output: &str) -> Self {
        output
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(NormalizedPath::new)
            .filter(|path| path.as_str() != ".")
            .collect()
    }

    pub fn contains(&self, path: &NormalizedPath) -> bool {
        self.paths.contains(path)
    }

    /// Tracked paths at or below `dir`.
    pub fn within<'a>(&'a self, dir: &'a NormalizedPath) -> impl Iterator<Item = &'a NormalizedPath> {
        self.paths.iter().filter(move |p| p.is_within(dir))
    }

    /// Restrict the snapshot to `dir`.
    pub fn subtree(&self, dir: &NormalizedPath) -> Manifest {
        self.within(dir).cloned().collect()
    }

    pub fn insert(&mut self, path: NormalizedPath) -> bool {
        self.paths.insert(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedPath> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FromIterator<NormalizedPath> for Manifest {
    fn from_iter<I: IntoIterator<Item = NormalizedPath>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}
