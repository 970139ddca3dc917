//! Retry policy and the retrying fetch loop

use crate::error::{Error, HttpError, Result};
use crate::transport::{HttpRequest, HttpResponse, Transport};
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User agent sent with every request unless the caller overrides it
pub const DEFAULT_USER_AGENT: &str = concat!("sigstore-rust/", env!("CARGO_PKG_VERSION"));

/// How many times, and how patiently, to retry a request
///
/// Accepts the same shapes as the configuration file: `true`/`false`, a retry
/// count, or a full [`RetryOptions`] object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RetryPolicy {
    /// `false` disables retries, `true` allows a single retry
    Enabled(bool),
    /// Number of retries after the first attempt
    Count(u32),
    /// Retry count with backoff settings
    Options(RetryOptions),
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Count(0)
    }
}

impl RetryPolicy {
    /// Resolve the policy into concrete options
    pub fn normalize(&self) -> RetryOptions {
        match self {
            RetryPolicy::Enabled(enabled) => RetryOptions {
                retries: u32::from(*enabled),
                ..RetryOptions::default()
            },
            RetryPolicy::Count(retries) => RetryOptions {
                retries: *retries,
                ..RetryOptions::default()
            },
            RetryPolicy::Options(options) => options.clone(),
        }
    }
}

impl From<bool> for RetryPolicy {
    fn from(enabled: bool) -> Self {
        RetryPolicy::Enabled(enabled)
    }
}

impl From<u32> for RetryPolicy {
    fn from(retries: u32) -> Self {
        RetryPolicy::Count(retries)
    }
}

impl From<RetryOptions> for RetryPolicy {
    fn from(options: RetryOptions) -> Self {
        RetryPolicy::Options(options)
    }
}

/// Retry budget and exponential backoff settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryOptions {
    /// Retries after the first attempt
    pub retries: u32,
    /// Exponential growth factor between delays
    pub factor: f64,
    /// Delay before the first retry, in milliseconds
    #[serde(rename = "minTimeout")]
    pub min_timeout_ms: u64,
    /// Upper bound for any delay, in milliseconds
    #[serde(rename = "maxTimeout")]
    pub max_timeout_ms: u64,
    /// Multiply each delay by a random factor in `[1, 2)`
    pub randomize: bool,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            retries: 0,
            factor: 2.0,
            min_timeout_ms: 1_000,
            max_timeout_ms: 60_000,
            randomize: false,
        }
    }
}

impl RetryOptions {
    /// Delay before retry number `retry` (0-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let mut delay = self.min_timeout_ms as f64 * self.factor.powi(exponent);
        if self.randomize {
            delay *= rand::rng().random_range(1.0..2.0);
        }
        let capped = delay.min(self.max_timeout_ms as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }
}

/// Whether a failed status is worth another attempt
pub fn is_retryable_status(status: u16) -> bool {
    status == 408 || status == 429 || status >= 500
}

/// Options for a single logical fetch
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Request method, POST when unset
    pub method: Option<Method>,
    /// Headers overriding the defaults
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<Vec<u8>>,
    /// Timeout applied to each attempt
    pub timeout: Option<Duration>,
    /// Retry policy, no retries when unset
    pub retry: Option<RetryPolicy>,
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers
}

/// Fetch `url`, retrying network failures and retryable statuses
///
/// Network failures are always retried while budget remains. Statuses 408,
/// 429 and 5xx are retried; any other non-success status fails immediately
/// with [`Error::Status`]. When the budget runs out the last error is returned.
pub async fn fetch_with_retry(
    transport: &dyn Transport,
    url: &str,
    options: FetchOptions,
) -> Result<HttpResponse> {
    let policy = options.retry.unwrap_or_default().normalize();
    let method = options.method.unwrap_or(Method::POST);

    let mut headers = default_headers();
    headers.extend(options.headers);

    let mut retry = 0;
    loop {
        let request = HttpRequest {
            method: method.clone(),
            url: url.to_string(),
            headers: headers.clone(),
            body: options.body.clone(),
            timeout: options.timeout,
        };

        let error = match transport.send(request).await {
            Ok(response) if response.is_success() => return Ok(response),
            Ok(response) => {
                let error = HttpError::from_response(&response);
                if !is_retryable_status(error.status) {
                    return Err(Error::Status(error));
                }
                Error::Status(error)
            }
            Err(error @ Error::Network(_)) => error,
            Err(error) => return Err(error),
        };

        if retry >= policy.retries {
            return Err(error);
        }

        let delay = policy.backoff(retry);
        tracing::debug!(
            "{} {} failed (attempt {}): {}; retrying in {:?}",
            method,
            url,
            retry + 1,
            error,
            delay
        );
        tokio::time::sleep(delay).await;
        retry += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use rstest::rstest;

    fn no_wait(retries: u32) -> RetryPolicy {
        RetryPolicy::Options(RetryOptions {
            retries,
            min_timeout_ms: 0,
            ..RetryOptions::default()
        })
    }

    fn options(retry: RetryPolicy) -> FetchOptions {
        FetchOptions {
            retry: Some(retry),
            ..FetchOptions::default()
        }
    }

    #[rstest]
    #[case(RetryPolicy::Enabled(false), 0)]
    #[case(RetryPolicy::Enabled(true), 1)]
    #[case(RetryPolicy::Count(5), 5)]
    #[case(no_wait(3), 3)]
    fn test_normalize(#[case] policy: RetryPolicy, #[case] retries: u32) {
        assert_eq!(policy.normalize().retries, retries);
    }

    #[test]
    fn test_policy_deserialize_shapes() {
        let p: RetryPolicy = serde_json::from_str("true").unwrap();
        assert_eq!(p, RetryPolicy::Enabled(true));
        let p: RetryPolicy = serde_json::from_str("3").unwrap();
        assert_eq!(p, RetryPolicy::Count(3));
        let p: RetryPolicy = serde_json::from_str(r#"{"factor": 3}"#).unwrap();
        let normalized = p.normalize();
        assert_eq!(normalized.retries, 0);
        assert_eq!(normalized.factor, 3.0);
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let opts = RetryOptions {
            retries: 10,
            factor: 2.0,
            min_timeout_ms: 100,
            max_timeout_ms: 500,
            randomize: false,
        };
        assert_eq!(opts.backoff(0), Duration::from_millis(100));
        assert_eq!(opts.backoff(1), Duration::from_millis(200));
        assert_eq!(opts.backoff(2), Duration::from_millis(400));
        assert_eq!(opts.backoff(3), Duration::from_millis(500));
    }

    #[test]
    fn test_backoff_randomized_within_bounds() {
        let opts = RetryOptions {
            min_timeout_ms: 100,
            randomize: true,
            ..RetryOptions::default()
        };
        let delay = opts.backoff(0);
        assert!(delay >= Duration::from_millis(100));
        assert!(delay < Duration::from_millis(200));
    }

    #[rstest]
    #[case(408, true)]
    #[case(429, true)]
    #[case(500, true)]
    #[case(503, true)]
    #[case(400, false)]
    #[case(404, false)]
    #[case(409, false)]
    fn test_retryable_status(#[case] status: u16, #[case] retryable: bool) {
        assert_eq!(is_retryable_status(status), retryable);
    }

    #[tokio::test]
    async fn test_succeeds_after_server_errors() {
        let transport = MockTransport::new();
        transport.respond(500, "oops");
        transport.respond(500, "oops");
        transport.respond(200, "ok");

        let response = fetch_with_retry(&transport, "http://tlog/x", options(no_wait(3)))
            .await
            .unwrap();

        assert_eq!(response.body, b"ok");
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_client_error_is_terminal() {
        let transport = MockTransport::new();
        transport.respond(400, r#"{"message":"malformed"}"#);
        transport.respond(200, "never reached");

        let err = fetch_with_retry(&transport, "http://tlog/x", options(no_wait(5)))
            .await
            .unwrap_err();

        let status = err.as_status().unwrap();
        assert_eq!(status.status, 400);
        assert_eq!(status.message, "malformed");
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_budget_exhausted_returns_last_error() {
        let transport = MockTransport::new();
        transport.respond(502, "");
        transport.respond(503, "");

        let err = fetch_with_retry(&transport, "http://tlog/x", options(no_wait(1)))
            .await
            .unwrap_err();

        assert_eq!(err.as_status().unwrap().status, 503);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_network_errors_are_retried() {
        let transport = MockTransport::new();
        transport.fail("connection reset");
        transport.respond(201, "created");

        let response = fetch_with_retry(&transport, "http://tlog/x", options(no_wait(1)))
            .await
            .unwrap();
        assert_eq!(response.status, 201);

        let transport = MockTransport::new();
        transport.fail("connection reset");
        let err = fetch_with_retry(&transport, "http://tlog/x", options(no_wait(0)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn test_defaults_and_header_override() {
        let transport = MockTransport::new();
        transport.respond(200, "");
        transport.respond(200, "");

        fetch_with_retry(&transport, "http://tsa/a", FetchOptions::default())
            .await
            .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("custom/1.0"));
        fetch_with_retry(
            &transport,
            "http://tsa/b",
            FetchOptions {
                method: Some(Method::GET),
                headers,
                timeout: Some(Duration::from_secs(5)),
                ..FetchOptions::default()
            },
        )
        .await
        .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].headers[USER_AGENT], DEFAULT_USER_AGENT);
        assert_eq!(requests[1].method, Method::GET);
        assert_eq!(requests[1].headers[USER_AGENT], "custom/1.0");
        assert_eq!(requests[1].timeout, Some(Duration::from_secs(5)));
    }
}
