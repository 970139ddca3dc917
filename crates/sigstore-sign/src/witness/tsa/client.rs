use crate::error::{ErrorCode, InternalError, Result};
use sigstore_crypto::sha256;
use sigstore_tsa::TimestampClient;

/// Requests RFC 3161 timestamps over signatures
#[derive(Debug, Clone)]
pub struct TSAClient {
    tsa: TimestampClient,
}

impl TSAClient {
    /// Wrap a timestamp authority client
    pub fn new(tsa: TimestampClient) -> Self {
        Self { tsa }
    }

    /// Timestamp the SHA-256 digest of `signature`
    pub async fn create_timestamp(&self, signature: &[u8]) -> Result<Vec<u8>> {
        self.tsa
            .timestamp_sha256(&sha256(signature))
            .await
            .map_err(|e| {
                InternalError::with_cause(
                    ErrorCode::TsaCreateTimestamp,
                    "error creating timestamp",
                    e,
                )
                .into()
            })
    }
}
