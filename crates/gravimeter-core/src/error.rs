//! Unified error types for Gravimeter Core.

use thiserror::Error;

/// Main error type for all Gravimeter operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CoreError {
    /// Network request failed (HTTP client).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Spawning or reading a system introspection command failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No matching language-server process, or no usable token on it.
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    /// A process was found but no port of it answered the probe.
    #[error("Port unreachable: {0}")]
    PortUnreachable(String),

    /// The server answered with a non-success HTTP status.
    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}

/// Result type alias for Gravimeter operations.
pub type CoreResult<T> = Result<T, CoreError>;
