//! Bundle assembly for Sigstore
//!
//! This crate assembles Sigstore bundles (versions 0.2 and 0.3) from signature
//! content, key material, transparency log entries and timestamps.

pub mod builder;
pub mod error;

pub use builder::{BundleBuilder, TlogEntryBuilder};
pub use error::{Error, Result};
