//! Error types for efr-registry

use std::path::PathBuf;

/// Result type for efr-registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur using the plugin registry
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Error fetching registry: {0}")]
    Network(#[from] efr_http::Error),

    #[error("Unknown plugin '{name}' (available: {})", .known.join(", "))]
    UnknownPlugin { name: String, known: Vec<String> },

    #[error("Plugin '{name}' is already installed; use --upgrade to reinstall it")]
    AlreadyInstalled { name: String },

    #[error("Failed to prepare install script at {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run install script with {interpreter}: {source}")]
    Interpreter {
        interpreter: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Install script from {url} failed ({})", describe_exit(.code))]
    ScriptFailed { url: String, code: Option<i32> },

    #[error("Failed to run {program}: {source}")]
    PackageManager {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program} uninstall {package}` failed ({})", describe_exit(.code))]
    UninstallFailed {
        program: String,
        package: String,
        code: Option<i32>,
    },

    #[error(transparent)]
    Fs(#[from] efr_fs::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
