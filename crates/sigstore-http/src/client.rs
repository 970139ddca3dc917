//! Shared HTTP client used by the Fulcio, Rekor and TSA clients

use crate::error::Result;
use crate::retry::{fetch_with_retry, FetchOptions, RetryPolicy};
use crate::transport::{HttpResponse, ReqwestTransport, Transport};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// A transport plus the retry and timeout settings applied to every call
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    timeout: Option<Duration>,
}

impl HttpClient {
    /// Create a client over the given transport, without retries or timeout
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            retry: RetryPolicy::default(),
            timeout: None,
        }
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: impl Into<RetryPolicy>) -> Self {
        self.retry = retry.into();
        self
    }

    /// Set the per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The configured retry policy
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Fetch with this client's retry and timeout unless `options` sets them
    pub async fn fetch(&self, url: &str, mut options: FetchOptions) -> Result<HttpResponse> {
        options.retry = options.retry.or_else(|| Some(self.retry.clone()));
        options.timeout = options.timeout.or(self.timeout);
        fetch_with_retry(self.transport.as_ref(), url, options).await
    }

    /// POST a JSON body
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<HttpResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        self.fetch(
            url,
            FetchOptions {
                method: Some(Method::POST),
                headers,
                body: Some(serde_json::to_vec(body)?),
                ..FetchOptions::default()
            },
        )
        .await
    }

    /// GET a JSON document
    pub async fn get_json(&self, url: &str) -> Result<HttpResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        self.fetch(
            url,
            FetchOptions {
                method: Some(Method::GET),
                headers,
                ..FetchOptions::default()
            },
        )
        .await
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestTransport::new()))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use crate::RetryOptions;

    #[tokio::test]
    async fn test_post_json_sets_body_and_headers() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(200, "{}");
        let client = HttpClient::new(transport.clone()).with_timeout(Duration::from_secs(3));

        client
            .post_json("http://ca/api", &serde_json::json!({"a": 1}))
            .await
            .unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        assert_eq!(request.body.as_deref(), Some(br#"{"a":1}"#.as_slice()));
        assert_eq!(request.timeout, Some(Duration::from_secs(3)));
    }

    #[tokio::test]
    async fn test_client_retry_policy_applies() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(429, "");
        transport.respond(200, "");
        let client = HttpClient::new(transport.clone()).with_retry(RetryOptions {
            retries: 1,
            min_timeout_ms: 0,
            ..RetryOptions::default()
        });

        client.get_json("http://tlog/entries/1").await.unwrap();
        assert_eq!(transport.request_count(), 2);
        assert_eq!(transport.requests()[0].method, Method::GET);
    }
}
