//! Fulcio client for certificate operations

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use sigstore_http::HttpClient;

/// A client for interacting with Fulcio
#[derive(Debug, Clone)]
pub struct FulcioClient {
    /// Base URL of the Fulcio instance
    url: String,
    /// HTTP client
    client: HttpClient,
}

impl FulcioClient {
    /// Create a new Fulcio client
    pub fn new(url: impl Into<String>, client: HttpClient) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Create a client for the public Sigstore Fulcio instance
    pub fn public() -> Self {
        Self::new("https://fulcio.sigstore.dev", HttpClient::default())
    }

    /// Create a client for the Sigstore staging Fulcio instance
    pub fn staging() -> Self {
        Self::new("https://fulcio.sigstage.dev", HttpClient::default())
    }

    /// Base URL of this instance
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request a signing certificate
    ///
    /// # Arguments
    /// * `identity_token` - The OIDC identity token
    /// * `public_key` - The public key in PEM format
    /// * `challenge` - Signature over the token subject proving possession of the private key
    pub async fn create_signing_certificate(
        &self,
        identity_token: &str,
        public_key: &str,
        challenge: &[u8],
    ) -> Result<SigningCertificate> {
        let url = format!("{}/api/v2/signingCert", self.url);

        let request = CreateSigningCertificateRequest {
            credentials: Credentials {
                oidc_identity_token: identity_token.to_string(),
            },
            public_key_request: PublicKeyRequest {
                public_key: PublicKeyData {
                    algorithm: "ECDSA".to_string(),
                    content: public_key.to_string(),
                },
                proof_of_possession: STANDARD.encode(challenge),
            },
        };

        tracing::debug!("requesting signing certificate from {}", url);
        let response = self.client.post_json(&url, &request).await?;
        Ok(response.json()?)
    }
}

/// Request to create a signing certificate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSigningCertificateRequest {
    /// OIDC credentials
    pub credentials: Credentials,
    /// Public key request
    pub public_key_request: PublicKeyRequest,
}

/// OIDC credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// OIDC identity token
    pub oidc_identity_token: String,
}

/// Public key request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyRequest {
    /// Public key
    pub public_key: PublicKeyData,
    /// Proof of possession (base64 signature)
    pub proof_of_possession: String,
}

/// Public key data for API requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKeyData {
    /// Key algorithm family
    pub algorithm: String,
    /// PEM-encoded key content
    pub content: String,
}

/// Signing certificate response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningCertificate {
    /// Chain whose leaf embeds the SCT
    #[serde(default)]
    pub signed_certificate_embedded_sct: Option<CertificateChain>,
    /// Chain returned alongside a detached SCT
    #[serde(default)]
    pub signed_certificate_detached_sct: Option<CertificateChain>,
}

/// Certificate chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateChain {
    /// Chain of certificates (PEM encoded)
    pub chain: ChainContent,
}

/// Chain content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainContent {
    /// Certificates in the chain, leaf first
    pub certificates: Vec<String>,
}

impl SigningCertificate {
    /// All certificates in the chain, preferring the embedded-SCT variant
    pub fn certificate_chain(&self) -> Result<&[String]> {
        self.signed_certificate_embedded_sct
            .as_ref()
            .or(self.signed_certificate_detached_sct.as_ref())
            .map(|c| c.chain.certificates.as_slice())
            .ok_or(Error::MissingCertificate)
    }

    /// Get the leaf certificate (PEM encoded)
    pub fn leaf_certificate(&self) -> Option<&str> {
        self.certificate_chain()
            .ok()
            .and_then(|chain| chain.first())
            .map(String::as_str)
    }
}
