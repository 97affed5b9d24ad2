//! Error types for musdex-vcs

use std::path::PathBuf;

/// Result type for musdex-vcs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in musdex-vcs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] musdex_fs::Error),

    #[error("Invalid command template '{template}': {message}")]
    InvalidTemplate { template: String, message: String },

    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' failed (exit code {code}): {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Repository at {path} has no working directory")]
    BareRepository { path: PathBuf },

    #[error("Unknown VCS '{name}'. Available: {available}")]
    UnknownVcs { name: String, available: String },
}
