//! Error types for efr-fs

use std::path::PathBuf;

/// Result type for efr-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in efr-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Expected a directory at {path}")]
    NotADirectory { path: PathBuf },

    #[error("Refusing to overwrite existing path {path}")]
    AlreadyExists { path: PathBuf },

    #[error("Failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("Invalid {kind} '{value}': {reason}")]
    InvalidIdentifier {
        kind: String,
        value: String,
        reason: String,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
