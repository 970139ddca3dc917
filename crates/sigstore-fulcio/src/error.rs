//! Error types for sigstore-fulcio

use thiserror::Error;

/// Errors that can occur in Fulcio operations
#[derive(Error, Debug)]
pub enum Error {
    /// Transport or HTTP status error
    #[error(transparent)]
    Http(#[from] sigstore_http::Error),

    /// The response carried no certificate chain
    #[error("missing certificate in response")]
    MissingCertificate,

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for Fulcio operations
pub type Result<T> = std::result::Result<T, Error>;
