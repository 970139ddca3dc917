//! Error types for sigstore-sign

use sigstore_http::HttpError;
use std::fmt;
use thiserror::Error;

/// A boxed, thread-safe error used as the cause of an [`InternalError`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Stable codes identifying which step of the signing pipeline failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The certificate authority did not issue a certificate
    CaCreateSigningCertificate,
    /// The transparency log did not accept the entry
    TlogCreateEntry,
    /// An existing transparency log entry could not be fetched
    TlogFetchEntry,
    /// The timestamp authority did not issue a timestamp
    TsaCreateTimestamp,
    /// The identity token could not be obtained
    IdentityTokenRead,
    /// The identity token could not be decoded
    IdentityTokenParse,
}

impl ErrorCode {
    /// The wire name of this code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CaCreateSigningCertificate => "CA_CREATE_SIGNING_CERTIFICATE_ERROR",
            ErrorCode::TlogCreateEntry => "TLOG_CREATE_ENTRY_ERROR",
            ErrorCode::TlogFetchEntry => "TLOG_FETCH_ENTRY_ERROR",
            ErrorCode::TsaCreateTimestamp => "TSA_CREATE_TIMESTAMP_ERROR",
            ErrorCode::IdentityTokenRead => "IDENTITY_TOKEN_READ_ERROR",
            ErrorCode::IdentityTokenParse => "IDENTITY_TOKEN_PARSE_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure of one pipeline step, tagged with a stable [`ErrorCode`]
///
/// When the cause chain contains an HTTP status error, its text is appended
/// to the message (`"<message> - (<status>) <server message>"`).
#[derive(Error, Debug)]
#[error("{message}")]
pub struct InternalError {
    /// Which step failed
    pub code: ErrorCode,
    /// Human-readable description
    pub message: String,
    /// The underlying error, if any
    #[source]
    pub cause: Option<BoxError>,
}

impl InternalError {
    /// An error without an underlying cause
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            cause: None,
        }
    }

    /// Wrap `cause`, appending the HTTP error text when there is one
    pub fn with_cause(
        code: ErrorCode,
        message: impl Into<String>,
        cause: impl Into<BoxError>,
    ) -> Self {
        let cause = cause.into();
        let mut message = message.into();
        if let Some(http) = find_http_error(cause.as_ref()) {
            message = format!("{} - {}", message, http);
        }
        Self {
            code,
            message,
            cause: Some(cause),
        }
    }

    /// The HTTP status error in the cause chain, if any
    pub fn http_error(&self) -> Option<&HttpError> {
        self.cause.as_deref().and_then(|c| find_http_error(c))
    }
}

fn find_http_error<'a>(error: &'a (dyn std::error::Error + 'static)) -> Option<&'a HttpError> {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(http) = err.downcast_ref::<HttpError>() {
            return Some(http);
        }
        if let Some(http) = err
            .downcast_ref::<sigstore_http::Error>()
            .and_then(sigstore_http::Error::as_status)
        {
            return Some(http);
        }
        current = err.source();
    }
    None
}

/// Errors that can occur while producing a bundle
#[derive(Error, Debug)]
pub enum Error {
    /// A pipeline step failed
    #[error(transparent)]
    Internal(#[from] InternalError),

    /// Key generation or signing failed
    #[error("Crypto error: {0}")]
    Crypto(#[from] sigstore_crypto::Error),

    /// The bundle could not be assembled
    #[error("Bundle error: {0}")]
    Bundle(#[from] sigstore_bundle::Error),

    /// A caller-supplied signer, identity provider or witness failed
    #[error("Signing error: {0}")]
    Signing(#[source] BoxError),
}

impl Error {
    /// Wrap the failure of a caller-supplied extension
    pub fn signing(cause: impl Into<BoxError>) -> Self {
        Error::Signing(cause.into())
    }

    /// The pipeline error code, for [`Error::Internal`]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::Internal(e) => Some(e.code),
            _ => None,
        }
    }
}

/// Result type for signing operations
pub type Result<T> = std::result::Result<T, Error>;
