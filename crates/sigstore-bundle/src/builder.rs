//! Bundle builder for creating Sigstore bundles

use crate::error::{Error, Result};
use sigstore_types::{
    bundle::{
        CertificateContent, CheckpointData, InclusionPromise, InclusionProof, KindVersion, LogId,
        MessageSignature, SignatureContent, TransparencyLogEntry, VerificationMaterial,
        VerificationMaterialContent,
    },
    Bundle, DsseEnvelope, KeyMaterial, MediaType, MessageDigest,
};

/// Builder for creating Sigstore bundles
///
/// The media type follows the verification material: v0.3 for a single
/// certificate, v0.2 otherwise. Built bundles carry no tlog entries or
/// timestamps.
#[derive(Debug, Default)]
pub struct BundleBuilder {
    /// Verification material content
    verification_content: Option<VerificationMaterialContent>,
    /// Signature content
    signature_content: Option<SignatureContent>,
}

impl BundleBuilder {
    /// Create a new, empty bundle builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the signing certificate (DER)
    pub fn certificate(mut self, cert_der: Vec<u8>) -> Self {
        self.verification_content = Some(VerificationMaterialContent::Certificate(
            CertificateContent {
                raw_bytes: cert_der,
            },
        ));
        self
    }

    /// Set the certificate chain (DER, leaf first)
    pub fn certificate_chain(mut self, certs_der: Vec<Vec<u8>>) -> Self {
        self.verification_content = Some(VerificationMaterialContent::X509CertificateChain {
            certificates: certs_der
                .into_iter()
                .map(|raw_bytes| CertificateContent { raw_bytes })
                .collect(),
        });
        self
    }

    /// Set the public key hint
    pub fn public_key(mut self, hint: String) -> Self {
        self.verification_content = Some(VerificationMaterialContent::PublicKey { hint });
        self
    }

    /// Set the verification material from a signer's key material
    ///
    /// Certificate chains are decoded from PEM. With `single_certificate` only
    /// the leaf is kept.
    pub fn key_material(self, key: &KeyMaterial, single_certificate: bool) -> Result<Self> {
        match key {
            KeyMaterial::PublicKey { hint, .. } => {
                Ok(self.public_key(hint.clone().unwrap_or_default()))
            }
            KeyMaterial::Certificate { certificate } => {
                let mut chain: Vec<Vec<u8>> = pem::parse_many(certificate)?
                    .into_iter()
                    .filter(|p| p.tag() == "CERTIFICATE")
                    .map(pem::Pem::into_contents)
                    .collect();
                if chain.is_empty() {
                    return Err(Error::NoCertificates);
                }
                if single_certificate {
                    let leaf = chain.swap_remove(0);
                    Ok(self.certificate(leaf))
                } else {
                    Ok(self.certificate_chain(chain))
                }
            }
        }
    }

    /// Set the message signature
    pub fn message_signature(mut self, signature: Vec<u8>, digest: MessageDigest) -> Self {
        self.signature_content = Some(SignatureContent::MessageSignature(MessageSignature {
            message_digest: Some(digest),
            signature,
        }));
        self
    }

    /// Set the DSSE envelope
    pub fn dsse_envelope(mut self, envelope: DsseEnvelope) -> Self {
        self.signature_content = Some(SignatureContent::DsseEnvelope(envelope));
        self
    }

    /// Build the bundle
    pub fn build(self) -> Result<Bundle> {
        let verification_content = self
            .verification_content
            .ok_or(Error::Incomplete("verification material not set"))?;

        let signature_content = self
            .signature_content
            .ok_or(Error::Incomplete("signature content not set"))?;

        let version = match verification_content {
            VerificationMaterialContent::Certificate(_) => MediaType::Bundle0_3,
            _ => MediaType::Bundle0_2,
        };

        Ok(Bundle {
            media_type: version.as_str().to_string(),
            verification_material: VerificationMaterial::new(verification_content),
            content: signature_content,
        })
    }
}

/// Helper to create a transparency log entry
#[derive(Debug)]
pub struct TlogEntryBuilder {
    log_index: i64,
    log_id: Vec<u8>,
    kind: String,
    kind_version: String,
    integrated_time: i64,
    canonicalized_body: Vec<u8>,
    inclusion_promise: Option<InclusionPromise>,
    inclusion_proof: Option<InclusionProof>,
}

impl TlogEntryBuilder {
    /// Create a new tlog entry builder
    pub fn new() -> Self {
        Self {
            log_index: 0,
            log_id: Vec::new(),
            kind: "hashedrekord".to_string(),
            kind_version: "0.0.1".to_string(),
            integrated_time: 0,
            canonicalized_body: Vec::new(),
            inclusion_promise: None,
            inclusion_proof: None,
        }
    }

    /// Set the log index
    pub fn log_index(mut self, index: i64) -> Self {
        self.log_index = index;
        self
    }

    /// Set the log ID (raw key ID bytes)
    pub fn log_id(mut self, id: Vec<u8>) -> Self {
        self.log_id = id;
        self
    }

    /// Set the entry kind
    pub fn kind(mut self, kind: impl Into<String>, version: impl Into<String>) -> Self {
        self.kind = kind.into();
        self.kind_version = version.into();
        self
    }

    /// Set the integrated time (Unix timestamp)
    pub fn integrated_time(mut self, time: i64) -> Self {
        self.integrated_time = time;
        self
    }

    /// Set the canonicalized body (decoded bytes)
    pub fn canonicalized_body(mut self, body: Vec<u8>) -> Self {
        self.canonicalized_body = body;
        self
    }

    /// Set the inclusion promise (Signed Entry Timestamp)
    pub fn inclusion_promise(mut self, signed_entry_timestamp: Vec<u8>) -> Self {
        self.inclusion_promise = Some(InclusionPromise {
            signed_entry_timestamp,
        });
        self
    }

    /// Set the inclusion proof
    pub fn inclusion_proof(
        mut self,
        log_index: i64,
        root_hash: Vec<u8>,
        tree_size: i64,
        hashes: Vec<Vec<u8>>,
        checkpoint: String,
    ) -> Self {
        self.inclusion_proof = Some(InclusionProof {
            log_index: log_index.to_string(),
            root_hash,
            tree_size: tree_size.to_string(),
            hashes,
            checkpoint: CheckpointData {
                envelope: checkpoint,
            },
        });
        self
    }

    /// Build the transparency log entry
    pub fn build(self) -> TransparencyLogEntry {
        TransparencyLogEntry {
            log_index: self.log_index.to_string(),
            log_id: LogId {
                key_id: self.log_id,
            },
            kind_version: KindVersion {
                kind: self.kind,
                version: self.kind_version,
            },
            integrated_time: self.integrated_time.to_string(),
            inclusion_promise: self.inclusion_promise,
            inclusion_proof: self.inclusion_proof,
            canonicalized_body: self.canonicalized_body,
        }
    }
}

impl Default for TlogEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigstore_types::DsseSignature;

    fn pem_chain(blocks: &[&[u8]]) -> String {
        blocks
            .iter()
            .map(|der| pem::encode(&pem::Pem::new("CERTIFICATE", der.to_vec())))
            .collect()
    }

    fn envelope() -> DsseEnvelope {
        DsseEnvelope::new(
            "text/plain".to_string(),
            b"hello".to_vec(),
            vec![DsseSignature {
                sig: b"sig".to_vec(),
                keyid: String::new(),
            }],
        )
    }

    #[test]
    fn test_build_requires_content() {
        assert!(matches!(
            BundleBuilder::new().public_key(String::new()).build(),
            Err(Error::Incomplete(_))
        ));
        assert!(matches!(
            BundleBuilder::new().dsse_envelope(envelope()).build(),
            Err(Error::Incomplete(_))
        ));
    }

    #[test]
    fn test_public_key_material() {
        let key = KeyMaterial::PublicKey {
            public_key: "PEM".to_string(),
            hint: Some("my-key".to_string()),
        };
        let bundle = BundleBuilder::new()
            .key_material(&key, false)
            .unwrap()
            .dsse_envelope(envelope())
            .build()
            .unwrap();

        assert_eq!(bundle.media_type, MediaType::Bundle0_2.as_str());
        assert_eq!(
            bundle.verification_material.content,
            VerificationMaterialContent::PublicKey {
                hint: "my-key".to_string()
            }
        );
        assert!(bundle.verification_material.tlog_entries.is_empty());
        assert!(bundle
            .verification_material
            .timestamp_verification_data
            .rfc3161_timestamps
            .is_empty());
    }

    #[test]
    fn test_certificate_chain_material() {
        let key = KeyMaterial::certificate(pem_chain(&[b"leaf", b"root"]));
        let bundle = BundleBuilder::new()
            .key_material(&key, false)
            .unwrap()
            .dsse_envelope(envelope())
            .build()
            .unwrap();

        assert_eq!(bundle.media_type, MediaType::Bundle0_2.as_str());
        let VerificationMaterialContent::X509CertificateChain { certificates } =
            &bundle.verification_material.content
        else {
            panic!("expected a certificate chain");
        };
        assert_eq!(certificates.len(), 2);
        assert_eq!(certificates[0].raw_bytes, b"leaf");
        assert_eq!(certificates[1].raw_bytes, b"root");
    }

    #[test]
    fn test_single_certificate_material() {
        let key = KeyMaterial::certificate(pem_chain(&[b"leaf", b"root"]));
        let bundle = BundleBuilder::new()
            .key_material(&key, true)
            .unwrap()
            .dsse_envelope(envelope())
            .build()
            .unwrap();

        assert_eq!(bundle.media_type, MediaType::Bundle0_3.as_str());
        assert_eq!(
            bundle.verification_material.content,
            VerificationMaterialContent::Certificate(CertificateContent {
                raw_bytes: b"leaf".to_vec()
            })
        );
    }

    #[test]
    fn test_empty_chain_rejected() {
        let key = KeyMaterial::certificate("no pem blocks here");
        assert!(matches!(
            BundleBuilder::new().key_material(&key, false),
            Err(Error::NoCertificates)
        ));
    }

    #[test]
    fn test_tlog_entry_builder() {
        let entry = TlogEntryBuilder::new()
            .log_index(42)
            .log_id(vec![0xab, 0xcd])
            .kind("dsse", "0.0.1")
            .integrated_time(1_700_000_000)
            .canonicalized_body(b"{}".to_vec())
            .inclusion_promise(b"set".to_vec())
            .inclusion_proof(41, vec![1; 32], 100, vec![vec![2; 32]], "checkpoint".into())
            .build();

        assert_eq!(entry.log_index, "42");
        assert_eq!(entry.integrated_time, "1700000000");
        assert_eq!(entry.kind_version.kind, "dsse");
        let proof = entry.inclusion_proof.unwrap();
        assert_eq!(proof.log_index, "41");
        assert_eq!(proof.tree_size, "100");
        assert_eq!(proof.checkpoint.envelope, "checkpoint");
    }
}
