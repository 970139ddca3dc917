//! Error types for sigstore-rekor

use thiserror::Error;

/// Errors that can occur in Rekor operations
#[derive(Error, Debug)]
pub enum Error {
    /// Transport or HTTP status error
    #[error(transparent)]
    Http(#[from] sigstore_http::Error),

    /// The response map held no entry
    #[error("empty response")]
    EmptyResponse,

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for Rekor operations
pub type Result<T> = std::result::Result<T, Error>;
