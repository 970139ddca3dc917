//! Dead Simple Signing Envelope (DSSE) types
//!
//! DSSE is a signature envelope format used for signing arbitrary payloads.
//! Specification: https://github.com/secure-systems-lab/dsse

use serde::{Deserialize, Serialize};

/// A DSSE envelope containing a signed payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsseEnvelope {
    /// Raw payload (base64 in JSON)
    #[serde(with = "crate::encoding::base64_bytes")]
    pub payload: Vec<u8>,
    /// Type URI of the payload
    pub payload_type: String,
    /// Signatures over the PAE (Pre-Authentication Encoding)
    pub signatures: Vec<DsseSignature>,
}

/// A signature in a DSSE envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsseSignature {
    /// Raw signature bytes (base64 in JSON)
    #[serde(with = "crate::encoding::base64_bytes")]
    pub sig: Vec<u8>,
    /// Key ID (optional hint for key lookup)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub keyid: String,
}

impl DsseEnvelope {
    /// Create a new DSSE envelope
    pub fn new(payload_type: String, payload: Vec<u8>, signatures: Vec<DsseSignature>) -> Self {
        Self {
            payload,
            payload_type,
            signatures,
        }
    }

    /// Get the Pre-Authentication Encoding (PAE) string
    ///
    /// PAE is the string that gets signed in DSSE:
    /// `DSSEv1 <payload_type_len> <payload_type> <payload_len> <payload>`
    pub fn pae(&self) -> Vec<u8> {
        pae(&self.payload_type, &self.payload)
    }
}

/// Compute the Pre-Authentication Encoding (PAE)
///
/// Format: `DSSEv1 <len(type)> <type> <len(body)> <body>`
///
/// Lengths are byte lengths in ASCII decimal.
pub fn pae(payload_type: &str, payload: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(payload_type.len() + payload.len() + 32);

    result.extend_from_slice(b"DSSEv1 ");
    result.extend_from_slice(format!("{} ", payload_type.len()).as_bytes());
    result.extend_from_slice(payload_type.as_bytes());
    result.push(b' ');
    result.extend_from_slice(format!("{} ", payload.len()).as_bytes());
    result.extend_from_slice(payload);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pae() {
        // Test vector from DSSE spec
        let pae_result = pae("application/example", b"hello world");
        let expected = b"DSSEv1 19 application/example 11 hello world";
        assert_eq!(pae_result, expected);
    }

    #[test]
    fn test_pae_empty_type() {
        assert_eq!(pae("", b"hi"), b"DSSEv1 0  2 hi");
    }

    #[test]
    fn test_pae_counts_bytes_not_chars() {
        // "é" is two bytes in UTF-8
        assert_eq!(pae("é", b""), "DSSEv1 2 é 0 ".as_bytes());
    }

    #[test]
    fn test_dsse_envelope_serde() {
        let envelope = DsseEnvelope::new(
            "text/plain".to_string(),
            b"hello".to_vec(),
            vec![DsseSignature {
                sig: vec![1, 2, 3],
                keyid: String::new(),
            }],
        );

        let json = serde_json::to_string(&envelope).unwrap();
        assert_eq!(
            json,
            r#"{"payload":"aGVsbG8=","payloadType":"text/plain","signatures":[{"sig":"AQID"}]}"#
        );
        let parsed: DsseEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(envelope, parsed);
    }
}
