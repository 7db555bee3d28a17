//! Error types for efr-git

use std::path::PathBuf;

/// Result type for efr-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in efr-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("No git repository found for directory: {path}")]
    NotARepository { path: PathBuf },

    #[error("Repository at {path} has no working directory")]
    BareRepository { path: PathBuf },

    #[error("Repository at {path} has no 'origin' remote")]
    NoOrigin { path: PathBuf },

    #[error("Unrecognized remote URL '{url}': expected an https:// or git@ URL")]
    UnrecognizedRemote { url: String },

    #[error("Could not run git: {source}")]
    GitUnavailable {
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed ({})", describe_exit(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
