use super::{CAClient, SignatureBundle, Signer};
use crate::error::{ErrorCode, InternalError, Result};
use crate::identity::IdentityProvider;
use async_trait::async_trait;
use sigstore_oidc::extract_jwt_subject;
use sigstore_types::KeyMaterial;
use std::sync::Arc;

/// Keyless signer: binds a key holder's public key to an OIDC identity
///
/// Each signature is made by the key holder. The returned key material is the
/// certificate chain Fulcio issued for the key holder's public key.
pub struct FulcioSigner {
    ca: CAClient,
    identity_provider: Arc<dyn IdentityProvider>,
    key_holder: Arc<dyn Signer>,
}

impl FulcioSigner {
    /// Create a keyless signer
    ///
    /// `key_holder` must produce public key material, e.g. an
    /// [`EphemeralSigner`](super::EphemeralSigner).
    pub fn new(
        ca: CAClient,
        identity_provider: Arc<dyn IdentityProvider>,
        key_holder: Arc<dyn Signer>,
    ) -> Self {
        Self {
            ca,
            identity_provider,
            key_holder,
        }
    }

    async fn identity_token(&self) -> Result<String> {
        self.identity_provider.get_token().await.map_err(|e| {
            InternalError::with_cause(
                ErrorCode::IdentityTokenRead,
                "error retrieving identity token",
                e,
            )
            .into()
        })
    }
}

impl std::fmt::Debug for FulcioSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FulcioSigner")
            .field("ca", &self.ca)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Signer for FulcioSigner {
    async fn sign(&self, data: &[u8]) -> Result<SignatureBundle> {
        let identity_token = self.identity_token().await?;

        let subject = extract_jwt_subject(&identity_token).map_err(|e| {
            InternalError::with_cause(
                ErrorCode::IdentityTokenParse,
                "error parsing identity token",
                e,
            )
        })?;

        // Proof of possession: the subject signed by the key being certified
        let challenge = self.key_holder.sign(subject.as_bytes()).await?;
        let KeyMaterial::PublicKey { public_key, .. } = &challenge.key else {
            return Err(InternalError::new(
                ErrorCode::CaCreateSigningCertificate,
                "unexpected format for signing key",
            )
            .into());
        };

        let chain = self
            .ca
            .create_signing_certificate(&identity_token, public_key, &challenge.signature)
            .await?;
        tracing::debug!("received certificate chain with {} certificates", chain.len());

        let signature = self.key_holder.sign(data).await?;

        Ok(SignatureBundle {
            signature: signature.signature,
            key: KeyMaterial::certificate(join_pem(&chain)),
        })
    }
}

/// Concatenate PEM blocks, one per line
fn join_pem(chain: &[String]) -> String {
    chain
        .iter()
        .map(|cert| {
            if cert.ends_with('\n') {
                cert.clone()
            } else {
                format!("{}\n", cert)
            }
        })
        .collect()
}
