//! Error types for sigstore-oidc

use thiserror::Error;

/// Errors that can occur while reading identity tokens
#[derive(Error, Debug)]
pub enum Error {
    /// Token error
    #[error("Token error: {0}")]
    Token(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for OIDC operations
pub type Result<T> = std::result::Result<T, Error>;
