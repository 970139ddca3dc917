//! Proposed transparency log entries built from signed content

use crate::error::{BoxError, ErrorCode, InternalError, Result};
use serde::{Deserialize, Serialize};
use sigstore_crypto::sha256;
use sigstore_rekor::{DsseEntry, HashedRekord, IntotoEntry, ProposedEntry};
use sigstore_types::{DsseEnvelope, MessageSignature, SignatureContent};

/// Log entry type used for DSSE envelopes
///
/// Message signatures are always logged as `hashedrekord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// `dsse` v0.0.1
    #[default]
    Dsse,
    /// `intoto` v0.0.2
    Intoto,
}

/// Build the entry to submit for `content`
///
/// For a certificate chain only the leaf certificate is submitted.
pub fn to_proposed_entry(
    content: &SignatureContent,
    public_key: &[u8],
    entry_type: EntryType,
) -> Result<ProposedEntry> {
    let public_key = leaf_pem(public_key);
    let entry = match content {
        SignatureContent::MessageSignature(sig) => hashed_rekord(sig, &public_key),
        SignatureContent::DsseEnvelope(envelope) => match entry_type {
            EntryType::Dsse => dsse(envelope, &public_key),
            EntryType::Intoto => intoto(envelope, &public_key),
        },
    };
    entry.map_err(|e| {
        InternalError::with_cause(ErrorCode::TlogCreateEntry, "error creating tlog entry", e)
            .into()
    })
}

fn hashed_rekord(
    sig: &MessageSignature,
    public_key: &str,
) -> std::result::Result<ProposedEntry, BoxError> {
    let digest = sig
        .message_digest
        .as_ref()
        .ok_or("missing message digest")?;
    if digest.digest.len() != digest.algorithm.digest_size() {
        return Err(format!(
            "message digest is {} bytes, expected {}",
            digest.digest.len(),
            digest.algorithm.digest_size()
        )
        .into());
    }
    Ok(ProposedEntry::HashedRekord(HashedRekord::new(
        digest.algorithm,
        &digest.digest,
        &sig.signature,
        public_key,
    )))
}

fn dsse(envelope: &DsseEnvelope, public_key: &str) -> std::result::Result<ProposedEntry, BoxError> {
    let envelope_json = serde_json::to_string(envelope)?;
    Ok(ProposedEntry::Dsse(DsseEntry::new(envelope_json, public_key)))
}

fn intoto(
    envelope: &DsseEnvelope,
    public_key: &str,
) -> std::result::Result<ProposedEntry, BoxError> {
    // serde_json::Value keeps object keys sorted, giving the canonical form
    let canonical = serde_json::to_vec(&serde_json::to_value(envelope)?)?;
    Ok(ProposedEntry::Intoto(IntotoEntry::new(
        envelope,
        public_key,
        &sha256(&canonical),
        &sha256(&envelope.payload),
    )))
}

/// The first PEM block of `public_key`, or the text itself if it has none
fn leaf_pem(public_key: &[u8]) -> String {
    let text = String::from_utf8_lossy(public_key);
    match pem::parse_many(text.as_bytes()) {
        Ok(blocks) if !blocks.is_empty() => pem::encode_config(
            &blocks[0],
            pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
        ),
        _ => text.into_owned(),
    }
}
