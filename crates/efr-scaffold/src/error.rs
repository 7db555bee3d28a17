//! Error types for efr-scaffold

use std::path::PathBuf;

/// Result type for efr-scaffold operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering templates or scaffolding projects
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Unknown template '{name}'")]
    UnknownTemplate { name: String },

    #[error("Template '{template}' is missing values for: {}", .missing.join(", "))]
    MissingPlaceholders {
        template: String,
        missing: Vec<String>,
    },

    #[error("Directory {path} already exists")]
    AlreadyExists { path: PathBuf },

    #[error("No Cargo.toml found in {path}")]
    NotAPluginProject { path: PathBuf },

    #[error("Failed to parse {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{path} has no package.{field}")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Failed to serialize registry entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Fs(#[from] efr_fs::Error),

    #[error(transparent)]
    Git(#[from] efr_git::Error),
}
