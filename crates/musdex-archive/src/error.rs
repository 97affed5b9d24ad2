//! Error types for musdex-archive

use std::path::PathBuf;

/// Result type for musdex-archive operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in musdex-archive operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] musdex_fs::Error),

    #[error("Cannot read archive {path}: {message}")]
    ContainerRead { path: PathBuf, message: String },

    #[error("Cannot write archive {path}: {message}")]
    ContainerWrite { path: PathBuf, message: String },

    #[error("Archive {archive} contains entry '{name}' that escapes the extraction root")]
    UnsafeEntry { archive: PathBuf, name: String },

    #[error("Unknown archive handler '{name}'. Available: {available}")]
    UnknownHandler { name: String, available: String },
}

impl Error {
    pub fn read(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::ContainerRead {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::ContainerWrite {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
