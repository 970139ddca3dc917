//! High-level signing API
//!
//! [`SigningContext`] wires a [`SigningConfig`] into keyless bundlers: an
//! ephemeral key certified by Fulcio, plus the Rekor and TSA witnesses the
//! configuration enables.

use crate::bundler::{Bundler, DssePackager, MessageSignaturePackager, Packager};
use crate::config::SigningConfig;
use crate::error::Result;
use crate::identity::IdentityProvider;
use crate::signer::{CAClient, EphemeralSigner, FulcioSigner};
use crate::witness::{RekorWitness, TLogClient, TSAClient, TSAWitness, Witness};
use sigstore_fulcio::FulcioClient;
use sigstore_http::{HttpClient, ReqwestTransport, Transport};
use sigstore_rekor::RekorClient;
use sigstore_tsa::TimestampClient;
use std::sync::Arc;
use std::time::Duration;

/// Context for signing operations
#[derive(Clone)]
pub struct SigningContext {
    config: SigningConfig,
    transport: Arc<dyn Transport>,
}

impl SigningContext {
    /// Create a new signing context with default configuration
    pub fn new() -> Self {
        Self::with_config(SigningConfig::default())
    }

    /// Create a new signing context with custom configuration
    pub fn with_config(config: SigningConfig) -> Self {
        Self {
            config,
            transport: Arc::new(ReqwestTransport::new()),
        }
    }

    /// Create a signing context for the public-good instance
    pub fn production() -> Self {
        Self::with_config(SigningConfig::production())
    }

    /// Create a signing context for the staging instance
    pub fn staging() -> Self {
        Self::with_config(SigningConfig::staging())
    }

    /// Send all service requests through `transport`
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &SigningConfig {
        &self.config
    }

    /// A keyless bundler producing DSSE envelopes
    ///
    /// # Example
    /// ```no_run
    /// use sigstore_sign::{Artifact, SigningContext, StaticIdentityProvider};
    /// use std::sync::Arc;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let context = SigningContext::production();
    /// let bundler = context.dsse_bundler(Arc::new(StaticIdentityProvider::new("token")))?;
    /// let artifact = Artifact::new(b"hello".to_vec()).with_type("text/plain");
    /// let bundle = bundler.create(&artifact).await?;
    /// println!("{}", bundle.to_json_pretty()?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn dsse_bundler(
        &self,
        identity_provider: Arc<dyn IdentityProvider>,
    ) -> Result<Bundler<DssePackager>> {
        let packager = DssePackager::new().single_certificate(self.config.single_certificate);
        self.bundler(packager, identity_provider)
    }

    /// A keyless bundler producing message signatures
    pub fn message_bundler(
        &self,
        identity_provider: Arc<dyn IdentityProvider>,
    ) -> Result<Bundler<MessageSignaturePackager>> {
        self.bundler(MessageSignaturePackager::new(), identity_provider)
    }

    fn bundler<P: Packager>(
        &self,
        packager: P,
        identity_provider: Arc<dyn IdentityProvider>,
    ) -> Result<Bundler<P>> {
        let signer = FulcioSigner::new(
            CAClient::new(FulcioClient::new(
                self.config.fulcio_url.clone(),
                self.http_client(),
            )),
            identity_provider,
            Arc::new(EphemeralSigner::new()?),
        );

        let mut bundler = Bundler::new(packager, Arc::new(signer));
        for witness in self.witnesses() {
            bundler = bundler.with_witness(witness);
        }
        Ok(bundler)
    }

    /// The witnesses enabled by the configuration, transparency log first
    pub fn witnesses(&self) -> Vec<Arc<dyn Witness>> {
        let mut witnesses: Vec<Arc<dyn Witness>> = Vec::new();

        if let Some(url) = &self.config.rekor_url {
            let rekor = RekorClient::new(url.clone(), self.http_client());
            witnesses.push(Arc::new(RekorWitness::new(
                TLogClient::new(rekor, self.config.fetch_on_conflict),
                self.config.entry_type,
            )));
        }
        if let Some(url) = &self.config.tsa_url {
            let tsa = TimestampClient::new(url.clone(), self.http_client());
            witnesses.push(Arc::new(TSAWitness::new(TSAClient::new(tsa))));
        }

        witnesses
    }

    fn http_client(&self) -> HttpClient {
        let client = HttpClient::new(self.transport.clone()).with_retry(self.config.retry.clone());
        match self.config.timeout_ms {
            Some(ms) => client.with_timeout(Duration::from_millis(ms)),
            None => client,
        }
    }
}

impl Default for SigningContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SigningContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
