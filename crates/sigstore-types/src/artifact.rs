//! Artifact types for signing
//!
//! An artifact is the content handed to the signing pipeline: raw bytes plus an
//! optional content-type label. The label is opaque to this crate; envelope
//! signing binds it into the signed bytes.

use serde::{Deserialize, Serialize};

/// An artifact to be signed
///
/// # Example
///
/// ```
/// use sigstore_types::Artifact;
///
/// let artifact = Artifact::new(b"hello".to_vec()).with_type("text/plain");
/// assert_eq!(artifact.payload_type(), "text/plain");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// The artifact bytes
    #[serde(with = "crate::encoding::base64_bytes")]
    pub data: Vec<u8>,
    /// Optional content-type label
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl Artifact {
    /// Create an untyped artifact
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            content_type: None,
        }
    }

    /// Attach a content-type label
    pub fn with_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The content type, or the empty string when none was given
    pub fn payload_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or("")
    }
}

impl From<&[u8]> for Artifact {
    fn from(bytes: &[u8]) -> Self {
        Artifact::new(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Artifact {
    fn from(bytes: Vec<u8>) -> Self {
        Artifact::new(bytes)
    }
}
