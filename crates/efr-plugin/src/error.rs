//! Error types for efr-plugin

use std::path::PathBuf;

/// Result type for discovery and manifest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reading plugin sources
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse plugin manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize plugin manifest: {0}")]
    ManifestSerialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Fs(#[from] efr_fs::Error),
}

/// Why a plugin entry could not be turned into a command node
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("invalid plugin name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("plugin '{name}' has nothing to invoke: a group needs a subcommand or a fallback")]
    NotInvocable { name: String },

    #[error("plugin command not found: {path}")]
    CommandNotFound { path: PathBuf },

    #[error("plugin command is not a file: {path}")]
    NotAFile { path: PathBuf },

    #[error("plugin command is not executable: {path}")]
    NotExecutable { path: PathBuf },

    #[error("plugin panicked while loading: {message}")]
    Panicked { message: String },

    #[error("{0}")]
    Constructor(String),
}

/// Failure running an external plugin executable
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {}", describe_exit(.code))]
    Exited { program: PathBuf, code: Option<i32> },
}

/// Failure dispatching argv through a command tree
#[derive(Debug, thiserror::Error)]
pub enum DispatchError<E> {
    #[error("unknown command '{name}' for '{path}' (available: {})", .available.join(", "))]
    UnknownCommand {
        path: String,
        name: String,
        available: Vec<String>,
    },

    #[error("{0}")]
    Command(E),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    }
}
