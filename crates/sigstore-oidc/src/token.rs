//! Identity token handling

use crate::error::{Error, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

/// An OIDC identity token
#[derive(Debug, Clone)]
pub struct IdentityToken {
    /// The raw JWT token
    raw: String,
    /// Parsed claims
    claims: TokenClaims,
}

/// Standard OIDC claims we care about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer
    pub iss: String,
    /// Subject
    #[serde(default)]
    pub sub: Option<String>,
    /// Audience (can be string or array)
    #[serde(default)]
    pub aud: Audience,
    /// Expiration time
    #[serde(default)]
    pub exp: u64,
    /// Email (Sigstore-specific)
    #[serde(default)]
    pub email: Option<String>,
}

/// Audience can be a single string or array of strings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Audience {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl IdentityToken {
    /// Parse a JWT token string
    ///
    /// The signature segment is not checked; Fulcio verifies the token.
    pub fn from_jwt(token: &str) -> Result<Self> {
        // JWT format: header.payload.signature
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(Error::Token("invalid JWT format".to_string()));
        }

        let payload = URL_SAFE_NO_PAD
            .decode(parts[1].trim_end_matches('='))
            .map_err(|e| Error::Token(format!("failed to decode payload: {}", e)))?;

        let claims: TokenClaims = serde_json::from_slice(&payload)
            .map_err(|e| Error::Token(format!("failed to parse claims: {}", e)))?;

        Ok(Self {
            raw: token.to_string(),
            claims,
        })
    }

    /// Get the raw JWT string
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Get the issuer
    pub fn issuer(&self) -> &str {
        &self.claims.iss
    }

    /// Get the subject
    pub fn subject(&self) -> Option<&str> {
        self.claims.sub.as_deref()
    }

    /// Get the email if present
    pub fn email(&self) -> Option<&str> {
        self.claims.email.as_deref()
    }

    /// Get the claims
    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }

    /// The identity Fulcio will bind into the certificate
    ///
    /// Email-based issuers identify the signer by the `email` claim; every
    /// other issuer uses `sub`.
    pub fn identity(&self) -> Result<&str> {
        let (claim, value) = if issuers::EMAIL_ISSUERS.contains(&self.issuer()) {
            ("email", self.email())
        } else {
            ("sub", self.subject())
        };
        value.ok_or_else(|| Error::Token(format!("missing {} claim", claim)))
    }
}

/// Extract the signing subject from a raw JWT
pub fn extract_jwt_subject(jwt: &str) -> Result<String> {
    let token = IdentityToken::from_jwt(jwt)?;
    token.identity().map(str::to_string)
}

/// Known OIDC issuers
pub mod issuers {
    /// Sigstore's public Dex instance
    pub const SIGSTORE_OAUTH: &str = "https://oauth2.sigstore.dev/auth";
    /// GitHub Actions OIDC
    pub const GITHUB_ACTIONS: &str = "https://token.actions.githubusercontent.com";
    /// Google Accounts
    pub const GOOGLE: &str = "https://accounts.google.com";

    /// Issuers whose tokens identify the signer by email
    pub const EMAIL_ISSUERS: &[&str] = &[GOOGLE, SIGSTORE_OAUTH];
}
