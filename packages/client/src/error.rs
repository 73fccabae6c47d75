//! Error types for the Yagura client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the credentials (wrong password, or a token it does not accept)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// HTTP API request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Outgoing frame could not be encoded
    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}
