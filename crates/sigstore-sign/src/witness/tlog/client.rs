use crate::error::{ErrorCode, InternalError, Result};
use sigstore_rekor::{LogEntry, ProposedEntry, RekorClient};

/// Creates transparency log entries, optionally deduplicating on conflict
///
/// When the log answers `409 Conflict` with a `Location` header and
/// `fetch_on_conflict` is set, the existing entry is fetched instead of
/// failing.
#[derive(Debug, Clone)]
pub struct TLogClient {
    rekor: RekorClient,
    fetch_on_conflict: bool,
}

impl TLogClient {
    /// Wrap a Rekor client
    pub fn new(rekor: RekorClient, fetch_on_conflict: bool) -> Self {
        Self {
            rekor,
            fetch_on_conflict,
        }
    }

    /// Create an entry, or fetch the existing one on conflict
    pub async fn create_entry(&self, proposed: &ProposedEntry) -> Result<LogEntry> {
        let err = match self.rekor.create_entry(proposed).await {
            Ok(entry) => return Ok(entry),
            Err(err) => err,
        };

        if self.fetch_on_conflict {
            if let Some(uuid) = conflicting_uuid(&err) {
                tracing::debug!("entry already exists in the log, fetching {}", uuid);
                return self.fetch_entry(&uuid).await;
            }
        }

        Err(InternalError::with_cause(
            ErrorCode::TlogCreateEntry,
            "error creating tlog entry",
            err,
        )
        .into())
    }

    /// Fetch an entry by UUID
    pub async fn fetch_entry(&self, uuid: &str) -> Result<LogEntry> {
        self.rekor.get_entry(uuid).await.map_err(|e| {
            InternalError::with_cause(ErrorCode::TlogFetchEntry, "error fetching tlog entry", e)
                .into()
        })
    }
}

/// The UUID named by the `Location` header of a 409 response
fn conflicting_uuid(err: &sigstore_rekor::Error) -> Option<String> {
    let sigstore_rekor::Error::Http(http) = err else {
        return None;
    };
    let status = http.as_status()?;
    if status.status != 409 {
        return None;
    }
    let location = status.location.as_deref()?;
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|uuid| !uuid.is_empty())
        .map(str::to_string)
}
