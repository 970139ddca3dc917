//! Serde helpers for the encodings used on the wire
//!
//! Byte fields in bundles and Rekor responses are carried as standard base64
//! strings. These modules are meant for `#[serde(with = "...")]`.

/// Serde helper for base64 encoding/decoding of byte arrays
pub mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}

/// Serde helper for `Vec<Vec<u8>>` carried as a list of base64 strings
pub mod base64_bytes_vec {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&STANDARD.encode(item))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<String>::deserialize(deserializer)?
            .into_iter()
            .map(|s| STANDARD.decode(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde(with = "super::base64_bytes")]
        one: Vec<u8>,
        #[serde(with = "super::base64_bytes_vec")]
        many: Vec<Vec<u8>>,
    }

    #[test]
    fn test_encodes_as_standard_base64() {
        let holder = Holder {
            one: b"hello".to_vec(),
            many: vec![vec![0xff, 0xfe], vec![]],
        };
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, r#"{"one":"aGVsbG8=","many":["//4=",""]}"#);
    }

    #[test]
    fn test_rejects_invalid_base64() {
        let result: Result<Holder, _> = serde_json::from_str(r#"{"one":"***","many":[]}"#);
        assert!(result.is_err());
    }
}
