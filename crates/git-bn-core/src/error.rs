//! Error types for git-bn-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using git-bn-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for branch note operations
#[derive(Error, Debug)]
pub enum Error {
    // Repository errors
    #[error("git not found. Install git to use git-bn.")]
    GitNotFound,

    #[error("Not a git repository: {0}\nRun git-bn from inside a git working tree, or pass -C <path>.")]
    NotAGitRepository(String),

    #[error("HEAD is detached; pass a branch name explicitly")]
    DetachedHead,

    #[error("Failed to read commit details for {commit}: {reason}")]
    MetadataLookupFailed { commit: String, reason: String },

    // Remote errors
    #[error("{0}")]
    TransportFailure(String),

    // Store errors
    #[error("Cannot write note store, directory does not exist: {}", .0.display())]
    StorageUnavailable(PathBuf),

    #[error("Note store {} is not valid: {reason}", .path.display())]
    StorageCorrupt { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Command execution errors
    #[error("Command failed: {cmd}\n{stderr}")]
    CommandFailed { cmd: String, stderr: String },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create an error from a command failure
    pub fn command_failed(cmd: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandFailed {
            cmd: cmd.into(),
            stderr: stderr.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
