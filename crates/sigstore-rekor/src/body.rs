//! Canonicalized entry body inspection

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// The type header every canonicalized entry body starts with
///
/// Only `kind` and `apiVersion` are read; the type-specific `spec` is left
/// opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryBodyHeader {
    /// Entry kind, e.g. `hashedrekord`
    pub kind: String,
    /// Entry type version, e.g. `0.0.1`
    pub api_version: String,
}

impl EntryBodyHeader {
    /// Parse the header of a decoded canonicalized body
    pub fn parse(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }
}
