//! Timestamp authority witness

mod client;

pub use client::TSAClient;

use super::{Witness, WitnessMaterial};
use crate::error::{ErrorCode, InternalError, Result};
use async_trait::async_trait;
use sigstore_types::{Rfc3161Timestamp, SignatureContent};

/// Obtains an RFC 3161 timestamp over the signature
#[derive(Debug, Clone)]
pub struct TSAWitness {
    client: TSAClient,
}

impl TSAWitness {
    pub fn new(client: TSAClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Witness for TSAWitness {
    async fn testify(
        &self,
        content: &SignatureContent,
        _public_key: &[u8],
    ) -> Result<WitnessMaterial> {
        let signature = content.signature_bytes().ok_or_else(|| {
            InternalError::new(ErrorCode::TsaCreateTimestamp, "no signature to timestamp")
        })?;

        let signed_timestamp = self.client.create_timestamp(signature).await?;

        Ok(WitnessMaterial {
            rfc3161_timestamps: vec![Rfc3161Timestamp { signed_timestamp }],
            ..WitnessMaterial::default()
        })
    }
}
