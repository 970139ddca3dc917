//! Rekor log entry types

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use sigstore_types::HashAlgorithm;
use std::collections::HashMap;

/// A log entry from Rekor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// UUID of the entry (the key in the response map)
    #[serde(skip)]
    pub uuid: String,
    /// Body of the entry (base64 encoded canonicalized body)
    pub body: String,
    /// Integrated time (Unix timestamp)
    pub integrated_time: i64,
    /// Log ID (hex-encoded SHA-256 of the log's public key)
    #[serde(rename = "logID")]
    pub log_id: String,
    /// Log index
    pub log_index: i64,
    /// Verification data
    #[serde(default)]
    pub verification: Option<Verification>,
}

/// Verification data for a log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    /// Inclusion proof
    #[serde(default)]
    pub inclusion_proof: Option<RekorInclusionProof>,
    /// Signed entry timestamp (SET), base64 encoded
    #[serde(default)]
    pub signed_entry_timestamp: Option<String>,
}

/// Inclusion proof as returned by the Rekor V1 API.
///
/// Hashes are hex encoded and indices are integers, unlike the bundle's
/// `InclusionProof`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RekorInclusionProof {
    /// Checkpoint (signed tree head)
    pub checkpoint: String,
    /// Hashes in the proof path (hex-encoded)
    pub hashes: Vec<String>,
    /// Log index
    pub log_index: i64,
    /// Root hash (hex-encoded)
    pub root_hash: String,
    /// Tree size
    pub tree_size: i64,
}

/// Response from creating or fetching a log entry (map of UUID to LogEntry)
pub type LogEntryResponse = HashMap<String, LogEntry>;

/// An entry proposed for inclusion in the log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProposedEntry {
    /// `hashedrekord` v0.0.1
    HashedRekord(HashedRekord),
    /// `dsse` v0.0.1
    Dsse(DsseEntry),
    /// `intoto` v0.0.2
    Intoto(IntotoEntry),
}

impl ProposedEntry {
    /// The entry kind
    pub fn kind(&self) -> &str {
        match self {
            ProposedEntry::HashedRekord(e) => &e.kind,
            ProposedEntry::Dsse(e) => &e.kind,
            ProposedEntry::Intoto(e) => &e.kind,
        }
    }
}

/// HashedRekord entry for creating new log entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashedRekord {
    /// API version
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    /// Entry kind
    pub kind: String,
    /// Spec containing the actual data
    pub spec: HashedRekordSpec,
}

/// HashedRekord specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashedRekordSpec {
    /// Data containing the hash
    pub data: HashedRekordData,
    /// Signature
    pub signature: HashedRekordSignature,
}

/// Data portion of HashedRekord
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashedRekordData {
    /// Hash of the artifact
    pub hash: HashedRekordHash,
}

/// Hash in HashedRekord
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashedRekordHash {
    /// Hash algorithm (serializes as lowercase for Rekor API)
    #[serde(with = "sigstore_types::hash::hash_algorithm_lowercase")]
    pub algorithm: HashAlgorithm,
    /// Hash value (hex encoded)
    pub value: String,
}

/// Signature in HashedRekord
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashedRekordSignature {
    /// Signature content (base64 encoded)
    pub content: String,
    /// Public key
    #[serde(rename = "publicKey")]
    pub public_key: PublicKeyContent,
}

/// Base64-encoded PEM public key or certificate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKeyContent {
    pub content: String,
}

impl HashedRekord {
    /// Create a new HashedRekord entry
    ///
    /// # Arguments
    /// * `algorithm` - Algorithm of `digest`
    /// * `digest` - Digest of the artifact
    /// * `signature` - Signature bytes
    /// * `public_key_pem` - PEM public key or leaf certificate
    pub fn new(
        algorithm: HashAlgorithm,
        digest: &[u8],
        signature: &[u8],
        public_key_pem: &str,
    ) -> Self {
        Self {
            api_version: "0.0.1".to_string(),
            kind: "hashedrekord".to_string(),
            spec: HashedRekordSpec {
                data: HashedRekordData {
                    hash: HashedRekordHash {
                        algorithm,
                        value: hex::encode(digest),
                    },
                },
                signature: HashedRekordSignature {
                    content: STANDARD.encode(signature),
                    public_key: PublicKeyContent {
                        content: STANDARD.encode(public_key_pem),
                    },
                },
            },
        }
    }
}

/// DSSE entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsseEntry {
    pub api_version: String,
    pub kind: String,
    pub spec: DsseEntrySpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsseEntrySpec {
    pub proposed_content: DsseProposedContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsseProposedContent {
    /// The envelope as a JSON string
    pub envelope: String,
    /// Base64-encoded PEM verifiers
    pub verifiers: Vec<String>,
}

impl DsseEntry {
    /// Create a new DSSE entry from a serialized envelope
    ///
    /// The server extracts the signatures from the envelope, so only the
    /// verifier keys are listed separately.
    pub fn new(envelope_json: String, public_key_pem: &str) -> Self {
        Self {
            api_version: "0.0.1".to_string(),
            kind: "dsse".to_string(),
            spec: DsseEntrySpec {
                proposed_content: DsseProposedContent {
                    envelope: envelope_json,
                    verifiers: vec![STANDARD.encode(public_key_pem)],
                },
            },
        }
    }
}

/// In-toto entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntotoEntry {
    pub api_version: String,
    pub kind: String,
    pub spec: IntotoEntrySpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntotoEntrySpec {
    pub content: IntotoContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntotoContent {
    pub envelope: IntotoEnvelope,
    /// Digest of the canonical envelope JSON
    pub hash: IntotoHash,
    /// Digest of the envelope payload
    pub payload_hash: IntotoHash,
}

/// Envelope as stored by the intoto type
///
/// `payload` and each `sig` are base64 encoded twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntotoEnvelope {
    pub payload: String,
    pub payload_type: String,
    pub signatures: Vec<IntotoSignature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntotoSignature {
    pub sig: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyid: Option<String>,
    /// Base64-encoded PEM public key or leaf certificate
    pub public_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntotoHash {
    #[serde(with = "sigstore_types::hash::hash_algorithm_lowercase")]
    pub algorithm: HashAlgorithm,
    /// Hex-encoded digest
    pub value: String,
}

impl IntotoEntry {
    /// Create a new in-toto entry
    ///
    /// # Arguments
    /// * `envelope` - The DSSE envelope being logged
    /// * `public_key_pem` - PEM public key or leaf certificate of every signer
    /// * `envelope_hash` - SHA-256 of the canonical envelope JSON
    /// * `payload_hash` - SHA-256 of the envelope payload
    pub fn new(
        envelope: &sigstore_types::DsseEnvelope,
        public_key_pem: &str,
        envelope_hash: &[u8],
        payload_hash: &[u8],
    ) -> Self {
        let public_key = STANDARD.encode(public_key_pem);
        let signatures = envelope
            .signatures
            .iter()
            .map(|s| IntotoSignature {
                sig: STANDARD.encode(STANDARD.encode(&s.sig)),
                keyid: (!s.keyid.is_empty()).then(|| s.keyid.clone()),
                public_key: public_key.clone(),
            })
            .collect();

        Self {
            api_version: "0.0.2".to_string(),
            kind: "intoto".to_string(),
            spec: IntotoEntrySpec {
                content: IntotoContent {
                    envelope: IntotoEnvelope {
                        payload: STANDARD.encode(STANDARD.encode(&envelope.payload)),
                        payload_type: envelope.payload_type.clone(),
                        signatures,
                    },
                    hash: IntotoHash {
                        algorithm: HashAlgorithm::Sha2256,
                        value: hex::encode(envelope_hash),
                    },
                    payload_hash: IntotoHash {
                        algorithm: HashAlgorithm::Sha2256,
                        value: hex::encode(payload_hash),
                    },
                },
            },
        }
    }
}
