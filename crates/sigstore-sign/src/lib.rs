//! Sigstore bundle creation
//!
//! This crate signs artifacts and assembles Sigstore bundles. A
//! [`Bundler`] hands the prepared payload to a [`Signer`], lays the signature
//! out with a [`Packager`] and collects verification material from its
//! [`Witness`]es (Rekor transparency log entries, RFC 3161 timestamps).
//!
//! [`SigningContext`] builds keyless bundlers for the Sigstore public-good
//! or staging instances from a [`SigningConfig`].

pub mod bundler;
pub mod config;
pub mod error;
pub mod identity;
pub mod sign;
pub mod signer;
pub mod witness;

pub use bundler::{
    Bundler, DsseBundler, DssePackager, MessageSignatureBundler, MessageSignaturePackager,
    Packager,
};
pub use config::SigningConfig;
pub use error::{Error, ErrorCode, InternalError, Result};
pub use identity::{IdentityProvider, StaticIdentityProvider};
pub use sign::SigningContext;
pub use signer::{CAClient, EphemeralSigner, FulcioSigner, SignatureBundle, Signer};
pub use witness::{
    EntryType, RekorWitness, TLogClient, TSAClient, TSAWitness, Witness, WitnessMaterial,
};

pub use sigstore_types::{Artifact, Bundle, KeyMaterial};
