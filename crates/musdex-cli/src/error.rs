//! Error types for musdex-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from musdex-core
    #[error(transparent)]
    Core(#[from] musdex_core::Error),

    /// Error from musdex-fs
    #[error(transparent)]
    Fs(#[from] musdex_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}

impl From<musdex_vcs::Error> for CliError {
    fn from(e: musdex_vcs::Error) -> Self {
        Self::Core(e.into())
    }
}
