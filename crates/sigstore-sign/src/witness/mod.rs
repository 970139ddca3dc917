//! Witnesses attest to the existence of a signature
//!
//! A witness receives the signed content and the signer's public key material
//! and returns the verification material it produced: transparency log entries,
//! RFC 3161 timestamps, or both.

pub mod tlog;
pub mod tsa;

pub use tlog::{EntryType, RekorWitness, TLogClient};
pub use tsa::{TSAClient, TSAWitness};

use crate::error::Result;
use async_trait::async_trait;
use sigstore_types::{Rfc3161Timestamp, SignatureContent, TransparencyLogEntry};

/// Verification material contributed by one witness
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WitnessMaterial {
    /// Transparency log entries
    pub tlog_entries: Vec<TransparencyLogEntry>,
    /// RFC 3161 timestamps
    pub rfc3161_timestamps: Vec<Rfc3161Timestamp>,
}

/// Attests to a signature
#[async_trait]
pub trait Witness: Send + Sync {
    /// Produce verification material for `content`
    ///
    /// `public_key` is the signer's public key or PEM certificate chain.
    async fn testify(
        &self,
        content: &SignatureContent,
        public_key: &[u8],
    ) -> Result<WitnessMaterial>;
}
