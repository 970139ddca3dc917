use crate::error::{ErrorCode, InternalError, Result};
use sigstore_fulcio::FulcioClient;

/// Requests signing certificates, reporting failures as
/// [`ErrorCode::CaCreateSigningCertificate`]
#[derive(Debug, Clone)]
pub struct CAClient {
    fulcio: FulcioClient,
}

impl CAClient {
    /// Wrap a Fulcio client
    pub fn new(fulcio: FulcioClient) -> Self {
        Self { fulcio }
    }

    /// Request a certificate chain (PEM, leaf first) for `public_key`
    ///
    /// `challenge` is the signature over the token subject proving possession
    /// of the private key.
    pub async fn create_signing_certificate(
        &self,
        identity_token: &str,
        public_key: &str,
        challenge: &[u8],
    ) -> Result<Vec<String>> {
        let chain = self
            .fulcio
            .create_signing_certificate(identity_token, public_key, challenge)
            .await
            .and_then(|cert| cert.certificate_chain().map(<[String]>::to_vec));

        chain.map_err(|e| {
            InternalError::with_cause(
                ErrorCode::CaCreateSigningCertificate,
                "error creating signing certificate",
                e,
            )
            .into()
        })
    }
}
