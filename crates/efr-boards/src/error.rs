//! Error types for efr-boards

use std::path::PathBuf;

use crate::source::AssetKind;

/// Result type for efr-boards operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur scanning toolchains or installing boards
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("{kind} not found: {path}")]
    AssetNotFound { kind: AssetKind, path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Version selection failed: {message}")]
    Selection { message: String },

    #[error(transparent)]
    Fs(#[from] efr_fs::Error),

    #[error(transparent)]
    Http(#[from] efr_http::Error),
}
