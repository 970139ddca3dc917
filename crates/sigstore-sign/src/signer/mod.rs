//! Signers produce a signature plus the key material that verifies it

mod ca;
mod ephemeral;
mod fulcio;

pub use ca::CAClient;
pub use ephemeral::EphemeralSigner;
pub use fulcio::FulcioSigner;

use crate::error::Result;
use async_trait::async_trait;
use sigstore_types::KeyMaterial;

/// A signature and the key material needed to verify it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureBundle {
    /// Raw signature bytes
    pub signature: Vec<u8>,
    /// Public key or certificate chain of the signer
    pub key: KeyMaterial,
}

/// Signs a payload
#[async_trait]
pub trait Signer: Send + Sync {
    /// Sign `data`, returning the signature and the signer's key material
    async fn sign(&self, data: &[u8]) -> Result<SignatureBundle>;
}
