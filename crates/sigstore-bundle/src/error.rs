//! Error types for sigstore-bundle

use thiserror::Error;

/// Errors that can occur in bundle operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required part of the bundle was never set
    #[error("Incomplete bundle: {0}")]
    Incomplete(&'static str),

    /// The certificate chain held no certificate blocks
    #[error("no certificates found in PEM chain")]
    NoCertificates,

    /// PEM decoding error
    #[error("PEM error: {0}")]
    Pem(#[from] pem::PemError),
}

/// Result type for bundle operations
pub type Result<T> = std::result::Result<T, Error>;
