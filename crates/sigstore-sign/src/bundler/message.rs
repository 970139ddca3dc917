use super::Packager;
use crate::error::Result;
use crate::signer::SignatureBundle;
use sigstore_bundle::BundleBuilder;
use sigstore_crypto::sha256;
use sigstore_types::{Artifact, Bundle, MessageDigest};

/// Packages the signature as a message signature over the raw artifact
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageSignaturePackager;

impl MessageSignaturePackager {
    pub fn new() -> Self {
        Self
    }
}

impl Packager for MessageSignaturePackager {
    fn package(&self, artifact: &Artifact, signature: &SignatureBundle) -> Result<Bundle> {
        Ok(BundleBuilder::new()
            .key_material(&signature.key, false)?
            .message_signature(
                signature.signature.clone(),
                MessageDigest::sha256(sha256(&artifact.data)),
            )
            .build()?)
    }
}
