//! Cryptographic primitives for Sigstore signing
//!
//! This crate provides hashing and ephemeral key generation/signing
//! using aws-lc-rs as the cryptographic backend.

pub mod error;
pub mod hash;
pub mod signing;

pub use error::{Error, Result};
pub use hash::sha256;
pub use signing::{KeyPair, PublicKeyPem, SigningScheme};
