//! Bundle creation: sign, package, then collect witness material
//!
//! A [`Bundler`] owns one [`Signer`], a list of [`Witness`]es and a
//! [`Packager`] deciding what bytes get signed and how the signature is laid
//! out in the bundle.

mod dsse;
mod message;

pub use dsse::DssePackager;
pub use message::MessageSignaturePackager;

use crate::error::Result;
use crate::signer::{SignatureBundle, Signer};
use crate::witness::Witness;
use futures_util::future::try_join_all;
use sigstore_types::{Artifact, Bundle};
use std::sync::Arc;

/// Turns an artifact and its signature into a bundle
pub trait Packager: Send + Sync {
    /// The bytes handed to the signer
    fn prepare(&self, artifact: &Artifact) -> Vec<u8> {
        artifact.data.clone()
    }

    /// Lay out the signature and key material in a new bundle
    ///
    /// The returned bundle carries no witness material yet.
    fn package(&self, artifact: &Artifact, signature: &SignatureBundle) -> Result<Bundle>;
}

/// Bundler producing DSSE envelopes
pub type DsseBundler = Bundler<DssePackager>;

/// Bundler producing message signatures
pub type MessageSignatureBundler = Bundler<MessageSignaturePackager>;

/// Signs artifacts and collects witness material into a bundle
pub struct Bundler<P> {
    packager: P,
    signer: Arc<dyn Signer>,
    witnesses: Vec<Arc<dyn Witness>>,
}

impl<P: Packager> Bundler<P> {
    /// Create a bundler without witnesses
    pub fn new(packager: P, signer: Arc<dyn Signer>) -> Self {
        Self {
            packager,
            signer,
            witnesses: Vec::new(),
        }
    }

    /// Append a witness; material is merged in the order witnesses are added
    pub fn with_witness(mut self, witness: Arc<dyn Witness>) -> Self {
        self.witnesses.push(witness);
        self
    }

    /// The configured witnesses
    pub fn witnesses(&self) -> &[Arc<dyn Witness>] {
        &self.witnesses
    }

    /// Sign `artifact` and return its bundle
    ///
    /// Witnesses run concurrently. The first witness failure fails the call
    /// and the remaining witnesses are dropped.
    pub async fn create(&self, artifact: &Artifact) -> Result<Bundle> {
        let payload = self.packager.prepare(artifact);
        tracing::debug!("signing {} byte payload", payload.len());

        let signature = self.signer.sign(&payload).await?;
        let mut bundle = self.packager.package(artifact, &signature)?;

        tracing::debug!("collecting material from {} witnesses", self.witnesses.len());
        let public_key = signature.key.public_key_bytes();
        let content = &bundle.content;
        let materials = try_join_all(
            self.witnesses
                .iter()
                .map(|witness| witness.testify(content, public_key)),
        )
        .await?;

        let verification = &mut bundle.verification_material;
        for material in materials {
            verification.tlog_entries.extend(material.tlog_entries);
            verification
                .timestamp_verification_data
                .rfc3161_timestamps
                .extend(material.rfc3161_timestamps);
        }
        tracing::debug!(
            "bundle has {} tlog entries and {} timestamps",
            verification.tlog_entries.len(),
            verification.timestamp_verification_data.rfc3161_timestamps.len()
        );

        Ok(bundle)
    }
}

impl<P: std::fmt::Debug> std::fmt::Debug for Bundler<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundler")
            .field("packager", &self.packager)
            .field("witnesses", &self.witnesses.len())
            .finish_non_exhaustive()
    }
}
