//! Fulcio certificate authority client for Sigstore
//!
//! This crate provides a client for requesting short-lived signing
//! certificates from Fulcio, the Sigstore certificate authority service.

pub mod client;
pub mod error;

pub use client::{
    CertificateChain, ChainContent, CreateSigningCertificateRequest, Credentials, FulcioClient,
    PublicKeyData, PublicKeyRequest, SigningCertificate,
};
pub use error::{Error, Result};
