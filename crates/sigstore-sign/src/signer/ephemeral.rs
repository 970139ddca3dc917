use super::{SignatureBundle, Signer};
use crate::error::Result;
use async_trait::async_trait;
use sigstore_crypto::{KeyPair, SigningScheme};
use sigstore_types::KeyMaterial;

/// Signs with an in-memory key generated when the signer is created
///
/// The key never leaves the process; it is dropped with the signer.
#[derive(Debug)]
pub struct EphemeralSigner {
    key_pair: KeyPair,
    public_key_pem: String,
}

impl EphemeralSigner {
    /// Generate a fresh ECDSA P-256 key
    pub fn new() -> Result<Self> {
        Self::with_scheme(SigningScheme::EcdsaP256Sha256)
    }

    /// Generate a fresh key for the given scheme
    pub fn with_scheme(scheme: SigningScheme) -> Result<Self> {
        let key_pair = KeyPair::generate(scheme)?;
        let public_key_pem = key_pair.public_key_to_pem()?.into_string();
        Ok(Self {
            key_pair,
            public_key_pem,
        })
    }

    /// The PEM-encoded public key
    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }
}

#[async_trait]
impl Signer for EphemeralSigner {
    async fn sign(&self, data: &[u8]) -> Result<SignatureBundle> {
        let signature = self.key_pair.sign(data)?;
        Ok(SignatureBundle {
            signature,
            key: KeyMaterial::public_key(self.public_key_pem.clone()),
        })
    }
}
