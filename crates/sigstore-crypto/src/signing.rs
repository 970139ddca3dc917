//! Ephemeral key generation and signing using aws-lc-rs

use crate::error::{Error, Result};
use aws_lc_rs::{
    rand::SystemRandom,
    signature::{
        EcdsaKeyPair, KeyPair as AwsKeyPair, ECDSA_P256_SHA256_ASN1_SIGNING,
        ECDSA_P384_SHA384_ASN1_SIGNING,
    },
};
use der::asn1::BitString;
use der::Encode;
use spki::{AlgorithmIdentifier, SubjectPublicKeyInfo};

const ID_EC_PUBLIC_KEY: const_oid::ObjectIdentifier =
    const_oid::ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const SECP256R1: const_oid::ObjectIdentifier =
    const_oid::ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const SECP384R1: const_oid::ObjectIdentifier =
    const_oid::ObjectIdentifier::new_unwrap("1.3.132.0.34");

/// A PEM-encoded public key
///
/// This type wraps a public key in PEM format (with BEGIN/END headers).
/// It can be created from a `KeyPair` using `public_key_to_pem()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyPem(String);

impl PublicKeyPem {
    /// Create a new PublicKeyPem from a PEM string
    ///
    /// Note: This does not validate the PEM format.
    pub fn new(pem: String) -> Self {
        Self(pem)
    }

    /// Get the PEM string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner PEM string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PublicKeyPem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported signing schemes for ephemeral keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigningScheme {
    /// ECDSA P-256 with SHA-256
    #[default]
    EcdsaP256Sha256,
    /// ECDSA P-384 with SHA-384
    EcdsaP384Sha384,
}

impl SigningScheme {
    /// Get the name of this scheme
    pub fn name(&self) -> &'static str {
        match self {
            SigningScheme::EcdsaP256Sha256 => "ECDSA_P256_SHA256",
            SigningScheme::EcdsaP384Sha384 => "ECDSA_P384_SHA384",
        }
    }
}

/// An in-memory key pair for signing
pub struct KeyPair {
    scheme: SigningScheme,
    inner: EcdsaKeyPair,
}

impl KeyPair {
    /// Generate a fresh key pair for the given scheme
    pub fn generate(scheme: SigningScheme) -> Result<Self> {
        let alg = match scheme {
            SigningScheme::EcdsaP256Sha256 => &ECDSA_P256_SHA256_ASN1_SIGNING,
            SigningScheme::EcdsaP384Sha384 => &ECDSA_P384_SHA384_ASN1_SIGNING,
        };
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(alg, &rng).map_err(|_| {
            Error::KeyGeneration(format!("failed to generate {} key", scheme.name()))
        })?;
        let inner = EcdsaKeyPair::from_pkcs8(alg, pkcs8.as_ref())?;
        Ok(Self { scheme, inner })
    }

    /// Get the raw (uncompressed point) public key bytes
    pub fn public_key_bytes(&self) -> &[u8] {
        self.inner.public_key().as_ref()
    }

    /// Sign data, returning an ASN.1 DER signature
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        let rng = SystemRandom::new();
        let sig = self.inner.sign(&rng, data)?;
        Ok(sig.as_ref().to_vec())
    }

    /// Get the public key in DER-encoded SubjectPublicKeyInfo format
    pub fn public_key_to_der(&self) -> Result<Vec<u8>> {
        let curve = match self.scheme {
            SigningScheme::EcdsaP256Sha256 => SECP256R1,
            SigningScheme::EcdsaP384Sha384 => SECP384R1,
        };

        let alg_id = AlgorithmIdentifier {
            oid: ID_EC_PUBLIC_KEY,
            parameters: Some(der::Any::encode_from(&curve).map_err(|e| Error::Der(e.to_string()))?),
        };

        let spki = SubjectPublicKeyInfo {
            algorithm: alg_id,
            subject_public_key: BitString::from_bytes(self.public_key_bytes())
                .map_err(|e| Error::Der(e.to_string()))?,
        };

        spki.to_der().map_err(|e| Error::Der(e.to_string()))
    }

    /// Get the public key in PEM-encoded SubjectPublicKeyInfo format
    pub fn public_key_to_pem(&self) -> Result<PublicKeyPem> {
        let der = self.public_key_to_der()?;
        let pem = pem::Pem::new("PUBLIC KEY", der);
        Ok(PublicKeyPem::new(pem::encode(&pem)))
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}
