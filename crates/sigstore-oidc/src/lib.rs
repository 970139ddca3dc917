//! OpenID Connect identity tokens for Sigstore
//!
//! Token acquisition is left to the caller. This crate decodes the claims of
//! an already-issued JWT and derives the identity that Fulcio binds into the
//! signing certificate.

pub mod error;
pub mod token;

pub use error::{Error, Result};
pub use token::{extract_jwt_subject, issuers, Audience, IdentityToken, TokenClaims};
