//! Transparency log witness

mod client;
pub mod entry;

pub use client::TLogClient;
pub use entry::{to_proposed_entry, EntryType};

use super::{Witness, WitnessMaterial};
use crate::error::{BoxError, ErrorCode, InternalError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use sigstore_bundle::TlogEntryBuilder;
use sigstore_rekor::{EntryBodyHeader, LogEntry};
use sigstore_types::{SignatureContent, TransparencyLogEntry};

/// Records signatures in a Rekor transparency log
#[derive(Debug, Clone)]
pub struct RekorWitness {
    client: TLogClient,
    entry_type: EntryType,
}

impl RekorWitness {
    /// Create a witness logging DSSE envelopes as `entry_type`
    pub fn new(client: TLogClient, entry_type: EntryType) -> Self {
        Self { client, entry_type }
    }
}

#[async_trait]
impl Witness for RekorWitness {
    async fn testify(
        &self,
        content: &SignatureContent,
        public_key: &[u8],
    ) -> Result<WitnessMaterial> {
        let proposed = to_proposed_entry(content, public_key, self.entry_type)?;
        let entry = self.client.create_entry(&proposed).await?;

        let tlog_entry = to_transparency_log_entry(&entry).map_err(|e| {
            InternalError::with_cause(
                ErrorCode::TlogCreateEntry,
                "error parsing tlog entry",
                e,
            )
        })?;
        tracing::debug!(
            "logged {} entry at index {}",
            tlog_entry.kind_version.kind,
            tlog_entry.log_index
        );

        Ok(WitnessMaterial {
            tlog_entries: vec![tlog_entry],
            ..WitnessMaterial::default()
        })
    }
}

/// Translate a Rekor API entry into its bundle form
///
/// Hex fields are decoded to bytes and the body's `kind`/`apiVersion` become
/// the entry's kind and version.
pub fn to_transparency_log_entry(
    entry: &LogEntry,
) -> std::result::Result<TransparencyLogEntry, BoxError> {
    let body = STANDARD.decode(&entry.body)?;
    let header = EntryBodyHeader::parse(&body)?;

    let mut builder = TlogEntryBuilder::new()
        .log_index(entry.log_index)
        .log_id(hex::decode(&entry.log_id)?)
        .kind(header.kind, header.api_version)
        .integrated_time(entry.integrated_time)
        .canonicalized_body(body);

    if let Some(verification) = &entry.verification {
        if let Some(set) = &verification.signed_entry_timestamp {
            builder = builder.inclusion_promise(STANDARD.decode(set)?);
        }
        if let Some(proof) = &verification.inclusion_proof {
            let hashes = proof
                .hashes
                .iter()
                .map(hex::decode)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            builder = builder.inclusion_proof(
                proof.log_index,
                hex::decode(&proof.root_hash)?,
                proof.tree_size,
                hashes,
                proof.checkpoint.clone(),
            );
        }
    }

    Ok(builder.build())
}
