//! Service endpoints and pipeline options

use crate::witness::EntryType;
use serde::{Deserialize, Serialize};
use sigstore_http::RetryPolicy;

/// Sigstore public-good Fulcio
pub const PRODUCTION_FULCIO_URL: &str = "https://fulcio.sigstore.dev";
/// Sigstore public-good Rekor
pub const PRODUCTION_REKOR_URL: &str = "https://rekor.sigstore.dev";
/// Sigstore public-good timestamp authority
pub const PRODUCTION_TSA_URL: &str = "https://timestamp.sigstore.dev";
/// Sigstore staging Fulcio
pub const STAGING_FULCIO_URL: &str = "https://fulcio.sigstage.dev";
/// Sigstore staging Rekor
pub const STAGING_REKOR_URL: &str = "https://rekor.sigstage.dev";
/// Sigstore staging timestamp authority
pub const STAGING_TSA_URL: &str = "https://timestamp.sigstage.dev";

/// Configuration for signing operations
///
/// Deserializes from camelCase JSON. Missing fields take the production
/// defaults, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SigningConfig {
    /// Fulcio base URL
    pub fulcio_url: String,
    /// Rekor base URL; no transparency log witness when unset
    pub rekor_url: Option<String>,
    /// Timestamp authority base URL; no timestamp witness when unset
    pub tsa_url: Option<String>,
    /// Retry policy for every service request
    pub retry: RetryPolicy,
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: Option<u64>,
    /// Fetch the existing log entry when Rekor reports a duplicate
    pub fetch_on_conflict: bool,
    /// Embed only the leaf certificate in DSSE bundles
    pub single_certificate: bool,
    /// Rekor entry type for DSSE envelopes
    pub entry_type: EntryType,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            fulcio_url: PRODUCTION_FULCIO_URL.to_string(),
            rekor_url: Some(PRODUCTION_REKOR_URL.to_string()),
            tsa_url: None,
            retry: RetryPolicy::Count(2),
            timeout_ms: None,
            fetch_on_conflict: true,
            single_certificate: false,
            entry_type: EntryType::default(),
        }
    }
}

impl SigningConfig {
    /// Configuration for the Sigstore public-good instance
    pub fn production() -> Self {
        Self::default()
    }

    /// Configuration for the Sigstore staging instance
    pub fn staging() -> Self {
        Self {
            fulcio_url: STAGING_FULCIO_URL.to_string(),
            rekor_url: Some(STAGING_REKOR_URL.to_string()),
            ..Self::default()
        }
    }

    /// Also request a timestamp from `url`
    pub fn with_tsa(mut self, url: impl Into<String>) -> Self {
        self.tsa_url = Some(url.into());
        self
    }

    /// Parse a JSON configuration
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
