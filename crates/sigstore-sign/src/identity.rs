//! Identity token sources for keyless signing

use crate::error::Result;
use async_trait::async_trait;

/// Supplies the OIDC identity token presented to the certificate authority
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Return a raw JWT
    async fn get_token(&self) -> Result<String>;
}

/// An identity provider that always returns the same token
///
/// Useful when the token was obtained out of band, e.g. from a CI
/// environment variable.
#[derive(Clone)]
pub struct StaticIdentityProvider {
    token: String,
}

impl StaticIdentityProvider {
    /// Wrap an already-issued token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticIdentityProvider")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn get_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticIdentityProvider::new("a.b.c");
        assert_eq!(provider.get_token().await.unwrap(), "a.b.c");
        assert!(!format!("{provider:?}").contains("a.b.c"));
    }
}
