//! Error types for efr-http

/// Result type for efr-http operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching remote resources
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
