//! Rekor transparency log client for Sigstore
//!
//! This crate provides a client for interacting with Rekor, the Sigstore
//! transparency log service, and the wire types of the entries it accepts.

pub mod body;
pub mod client;
pub mod entry;
pub mod error;

pub use body::EntryBodyHeader;
pub use client::RekorClient;
pub use entry::{
    DsseEntry, HashedRekord, IntotoEntry, LogEntry, LogEntryResponse, ProposedEntry,
    RekorInclusionProof, Verification,
};
pub use error::{Error, Result};
