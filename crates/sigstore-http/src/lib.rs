//! HTTP plumbing for the Sigstore service clients
//!
//! Every service client (Fulcio, Rekor, TSA) talks to its server through an
//! [`HttpClient`], which wraps an injected [`Transport`] with retry, backoff and
//! failure classification. Terminal failures surface as [`HttpError`].

pub mod client;
pub mod error;
pub mod retry;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod transport;

pub use client::HttpClient;
pub use error::{Error, HttpError, Result};
pub use retry::{
    fetch_with_retry, is_retryable_status, FetchOptions, RetryOptions, RetryPolicy,
    DEFAULT_USER_AGENT,
};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
