//! Error types for sigstore-tsa

use thiserror::Error;

/// Errors that can occur in TSA operations
#[derive(Error, Debug)]
pub enum Error {
    /// Transport or HTTP status error
    #[error(transparent)]
    Http(#[from] sigstore_http::Error),

    /// The authority answered with an empty body
    #[error("Invalid timestamp response: {0}")]
    InvalidResponse(String),
}

/// Result type for TSA operations
pub type Result<T> = std::result::Result<T, Error>;
