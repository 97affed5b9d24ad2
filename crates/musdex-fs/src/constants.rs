//! Well-known paths under the managed root.

use std::path::{Path, PathBuf};

/// Standard musdex filesystem locations, relative to the working root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagedPath {
    /// The `_musdex` directory holding extracted trees and bookkeeping
    BaseDir,
    /// The default config file
    Config,
    /// The default timestamp index
    Index,
    /// Config name used by yaml-era trees
    YamlConfig,
    /// Index name used by yaml-era trees
    YamlIndex,
}

impl ManagedPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BaseDir => "_musdex",
            Self::Config => "_musdex/musdex.toml",
            Self::Index => "_musdex/.musdex.index.toml",
            Self::YamlConfig => "_musdex/musdex.yaml",
            Self::YamlIndex => "_musdex/.musdex.index.yaml",
        }
    }

    /// Resolve under `root`, taking `fallback` instead when only it exists.
    pub fn locate(&self, root: &Path, fallback: ManagedPath) -> PathBuf {
        let preferred = root.join(self.as_str());
        let alternative = root.join(fallback.as_str());
        if !preferred.exists() && alternative.exists() {
            alternative
        } else {
            preferred
        }
    }
}

impl AsRef<Path> for ManagedPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ManagedPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ManagedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
