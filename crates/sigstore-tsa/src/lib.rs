//! Timestamp authority client for Sigstore
//!
//! This crate requests RFC 3161 timestamps from a Sigstore timestamp
//! authority through its JSON API. The returned token is kept opaque.

pub mod client;
pub mod error;

pub use client::{TimestampClient, TimestampRequest};
pub use error::{Error, Result};
