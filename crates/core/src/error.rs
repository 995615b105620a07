//! Error types for the Swift Cloud Tools client
//!
//! HTTP status codes are never errors: a 401, 404 or 422 from the server is a
//! normal [`ApiResponse`](crate::ApiResponse). Only faults that prevent a
//! response from being produced end up here.

use thiserror::Error;

/// Errors raised by the client itself, never by the server
#[derive(Error, Debug)]
pub enum Error {
    /// The request could not be sent or its response could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// The host and path did not form a usable URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name or value cannot be sent, e.g. an API key with control
    /// characters
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Configuration could not be loaded, saved or resolved
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem errors while handling the config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A request body could not be encoded, or a response body decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    General(String),
}

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Whether the error happened on the wire rather than locally
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Network(_) | Error::InvalidUrl(_))
    }
}
