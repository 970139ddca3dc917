use super::Packager;
use crate::error::Result;
use crate::signer::SignatureBundle;
use sigstore_bundle::BundleBuilder;
use sigstore_types::{pae, Artifact, Bundle, DsseEnvelope, DsseSignature, KeyMaterial};

/// Packages the artifact as a DSSE envelope
///
/// The signer signs the pre-authentication encoding of the artifact's type and
/// data. An artifact without a type is signed with an empty payload type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DssePackager {
    single_certificate: bool,
}

impl DssePackager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed only the leaf certificate instead of the full chain
    pub fn single_certificate(mut self, single_certificate: bool) -> Self {
        self.single_certificate = single_certificate;
        self
    }
}

impl Packager for DssePackager {
    fn prepare(&self, artifact: &Artifact) -> Vec<u8> {
        pae(artifact.payload_type(), &artifact.data)
    }

    fn package(&self, artifact: &Artifact, signature: &SignatureBundle) -> Result<Bundle> {
        let keyid = match &signature.key {
            KeyMaterial::PublicKey { hint, .. } => hint.clone().unwrap_or_default(),
            KeyMaterial::Certificate { .. } => String::new(),
        };
        let envelope = DsseEnvelope::new(
            artifact.payload_type().to_string(),
            artifact.data.clone(),
            vec![DsseSignature {
                sig: signature.signature.clone(),
                keyid,
            }],
        );

        Ok(BundleBuilder::new()
            .key_material(&signature.key, self.single_certificate)?
            .dsse_envelope(envelope)
            .build()?)
    }
}
