//! Error types for musdex-core

use std::path::PathBuf;

use musdex_fs::NormalizedPath;

/// Result type for musdex-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in musdex-core operations
///
/// `Config` and the transparent wrappers are fatal for a run. The remaining
/// variants concern one archive or one file and are collected in a
/// [`RunReport`](crate::RunReport) while the run continues.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Config or index file present but unusable
    #[error("Invalid configuration at {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: musdex_fs::Error,
    },

    #[error("Archive {archive} is already managed")]
    DuplicateArchive { archive: NormalizedPath },

    /// The selected handler cannot open the archive
    #[error("Archive {archive} is not supported by the '{handler}' handler")]
    Acceptance {
        archive: NormalizedPath,
        handler: String,
    },

    #[error("Cannot read archive {path}: {message}")]
    ContainerRead { path: PathBuf, message: String },

    #[error("Failed to register {path} with {vcs}: {source}")]
    VcsRegistration {
        path: NormalizedPath,
        vcs: String,
        #[source]
        source: musdex_vcs::Error,
    },

    #[error("Unknown archive handler '{name}'. Available: {available}")]
    UnknownHandler { name: String, available: String },

    #[error("Unknown VCS '{name}'. Available: {available}")]
    UnknownVcs { name: String, available: String },

    #[error("Archive {archive} is not managed")]
    NotManaged { archive: NormalizedPath },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from musdex-fs
    #[error(transparent)]
    Fs(#[from] musdex_fs::Error),

    /// VCS error from musdex-vcs
    #[error(transparent)]
    Vcs(musdex_vcs::Error),

    /// Archive error from musdex-archive
    #[error(transparent)]
    Archive(musdex_archive::Error),
}

impl From<musdex_archive::Error> for Error {
    fn from(e: musdex_archive::Error) -> Self {
        match e {
            musdex_archive::Error::ContainerRead { path, message } => {
                Self::ContainerRead { path, message }
            }
            musdex_archive::Error::UnsafeEntry { archive, name } => Self::ContainerRead {
                path: archive,
                message: format!("entry '{name}' escapes the extraction root"),
            },
            musdex_archive::Error::UnknownHandler { name, available } => {
                Self::UnknownHandler { name, available }
            }
            other => Self::Archive(other),
        }
    }
}

impl From<musdex_vcs::Error> for Error {
    fn from(e: musdex_vcs::Error) -> Self {
        match e {
            musdex_vcs::Error::UnknownVcs { name, available } => Self::UnknownVcs { name, available },
            other => Self::Vcs(other),
        }
    }
}
