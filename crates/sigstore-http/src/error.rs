//! Error types for sigstore-http

use crate::transport::HttpResponse;
use thiserror::Error;

/// A terminal, non-success HTTP response
///
/// Only produced once the retry budget is spent or the status is not retryable.
/// Callers match on `status` and `location` (e.g. 409 with a `Location` header).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("({status}) {message}")]
pub struct HttpError {
    /// HTTP status code
    pub status: u16,
    /// Server-provided message, or the status reason phrase
    pub message: String,
    /// Value of the `Location` response header
    pub location: Option<String>,
}

impl HttpError {
    /// Build an error from a failed response
    ///
    /// The message comes from a JSON body's `message` field when present,
    /// otherwise from the canonical reason phrase of the status.
    pub fn from_response(response: &HttpResponse) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            message: String,
        }

        let message = serde_json::from_slice::<ErrorBody>(&response.body)
            .map(|b| b.message)
            .ok()
            .or_else(|| {
                reqwest::StatusCode::from_u16(response.status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("HTTP status {}", response.status));

        Self {
            status: response.status,
            message,
            location: response.header("location").map(str::to_string),
        }
    }
}

/// Errors that can occur when talking to a Sigstore service
#[derive(Error, Debug)]
pub enum Error {
    /// The server answered with a non-success status
    #[error("HTTP error: {0}")]
    Status(#[from] HttpError),

    /// No response was received (connect, DNS, timeout, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The HTTP status error, if this is one
    pub fn as_status(&self) -> Option<&HttpError> {
        match self {
            Error::Status(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for HTTP operations
pub type Result<T> = std::result::Result<T, Error>;
