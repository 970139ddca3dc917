//! Key material attached to a signature

use serde::{Deserialize, Serialize};

/// The key or certificate that verifies a signature
///
/// Exactly one variant is present per signature. Unknown variants are rejected
/// when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum KeyMaterial {
    /// A bare public key
    PublicKey {
        /// PEM-encoded SubjectPublicKeyInfo
        public_key: String,
        /// Optional key hint recorded in the bundle
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
    },
    /// A PEM certificate chain, leaf first
    Certificate {
        /// Concatenated PEM blocks
        certificate: String,
    },
}

impl KeyMaterial {
    /// Public key material without a hint
    pub fn public_key(pem: impl Into<String>) -> Self {
        KeyMaterial::PublicKey {
            public_key: pem.into(),
            hint: None,
        }
    }

    /// Certificate chain material from PEM text
    pub fn certificate(chain_pem: impl Into<String>) -> Self {
        KeyMaterial::Certificate {
            certificate: chain_pem.into(),
        }
    }

    /// The bytes a witness uses to identify the signer
    ///
    /// For a public key this is the key itself, for a certificate the PEM chain.
    pub fn public_key_bytes(&self) -> &[u8] {
        match self {
            KeyMaterial::PublicKey { public_key, .. } => public_key.as_bytes(),
            KeyMaterial::Certificate { certificate } => certificate.as_bytes(),
        }
    }
}
