//! Error types for efr-github

/// Result type for efr-github operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to GitHub
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] efr_http::Error),

    #[error("Unknown {kind} '{value}' (expected one of: {})", .expected.join(", "))]
    UnknownChoice {
        kind: &'static str,
        value: String,
        expected: Vec<String>,
    },
}
