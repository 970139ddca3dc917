//! TSA client for the Sigstore timestamp API

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use sigstore_http::HttpClient;
use sigstore_types::HashAlgorithm;

/// Body of a timestamp request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampRequest {
    /// Base64-encoded digest to timestamp
    pub artifact_hash: String,
    /// Digest algorithm, lowercase (`sha256`)
    #[serde(with = "sigstore_types::hash::hash_algorithm_lowercase")]
    pub hash_algorithm: HashAlgorithm,
}

impl TimestampRequest {
    /// Request a timestamp over a SHA-256 digest
    pub fn sha256(digest: &[u8]) -> Self {
        Self {
            artifact_hash: STANDARD.encode(digest),
            hash_algorithm: HashAlgorithm::Sha2256,
        }
    }
}

/// A client for interacting with a Time-Stamp Authority
#[derive(Debug, Clone)]
pub struct TimestampClient {
    /// Base URL of the TSA
    url: String,
    /// HTTP client
    client: HttpClient,
}

impl TimestampClient {
    /// Create a new TSA client
    pub fn new(url: impl Into<String>, client: HttpClient) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Create a client for the Sigstore TSA
    pub fn sigstore() -> Self {
        Self::new("https://timestamp.sigstore.dev", HttpClient::default())
    }

    /// Base URL of this instance
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request a timestamp
    ///
    /// # Returns
    /// The raw timestamp response (DER-encoded TimeStampResp)
    pub async fn create_timestamp(&self, request: &TimestampRequest) -> Result<Vec<u8>> {
        let url = format!("{}/api/v1/timestamp", self.url);
        tracing::debug!("requesting timestamp from {}", url);

        let response = self.client.post_json(&url, request).await?;
        let body = response.into_body();
        if body.is_empty() {
            return Err(Error::InvalidResponse("empty body".to_string()));
        }
        Ok(body)
    }

    /// Request a timestamp for a SHA-256 digest
    pub async fn timestamp_sha256(&self, digest: &[u8]) -> Result<Vec<u8>> {
        self.create_timestamp(&TimestampRequest::sha256(digest))
            .await
    }
}
