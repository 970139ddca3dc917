//! Core types and data structures for Sigstore signing
//!
//! This crate provides the data model shared by the signing pipeline: artifacts,
//! key material, bundle content, transparency log entries and timestamps.

pub mod artifact;
pub mod bundle;
pub mod dsse;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod key;

pub use artifact::Artifact;
pub use bundle::{
    Bundle, CertificateContent, CheckpointData, InclusionPromise, InclusionProof, KindVersion,
    LogId, MediaType, MessageSignature, Rfc3161Timestamp, SignatureContent,
    TimestampVerificationData, TransparencyLogEntry, VerificationMaterial,
    VerificationMaterialContent,
};
pub use dsse::{pae, DsseEnvelope, DsseSignature};
pub use error::{Error, Result};
pub use hash::{HashAlgorithm, MessageDigest};
pub use key::KeyMaterial;
