//! Rekor client for transparency log operations

use crate::entry::{LogEntry, LogEntryResponse, ProposedEntry};
use crate::error::{Error, Result};
use sigstore_http::{HttpClient, HttpResponse};

/// A client for interacting with Rekor
#[derive(Debug, Clone)]
pub struct RekorClient {
    /// Base URL of the Rekor instance
    url: String,
    /// HTTP client
    client: HttpClient,
}

impl RekorClient {
    /// Create a new Rekor client
    pub fn new(url: impl Into<String>, client: HttpClient) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Create a client for the public Sigstore Rekor instance
    pub fn public() -> Self {
        Self::new("https://rekor.sigstore.dev", HttpClient::default())
    }

    /// Create a client for the Sigstore staging Rekor instance
    pub fn staging() -> Self {
        Self::new("https://rekor.sigstage.dev", HttpClient::default())
    }

    /// Base URL of this instance
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Create a new log entry
    pub async fn create_entry(&self, entry: &ProposedEntry) -> Result<LogEntry> {
        let url = format!("{}/api/v1/log/entries", self.url);
        tracing::debug!("creating {} entry at {}", entry.kind(), url);
        let response = self.client.post_json(&url, entry).await?;
        single_entry(response)
    }

    /// Get a log entry by UUID
    pub async fn get_entry(&self, uuid: &str) -> Result<LogEntry> {
        let url = format!("{}/api/v1/log/entries/{}", self.url, uuid);
        let response = self.client.get_json(&url).await?;
        single_entry(response)
    }
}

/// Extract the single entry from a `{uuid: entry}` response map
fn single_entry(response: HttpResponse) -> Result<LogEntry> {
    let entries: LogEntryResponse = response.json()?;
    let (uuid, mut entry) = entries.into_iter().next().ok_or(Error::EmptyResponse)?;
    entry.uuid = uuid;
    Ok(entry)
}
