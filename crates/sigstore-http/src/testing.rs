//! Scripted in-memory transport for tests

use crate::error::{Error, Result};
use crate::transport::{HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A [`Transport`] that replays queued outcomes and records requests
///
/// Outcomes are returned in the order they were queued. Once the queue is
/// empty every request fails with a network error.
#[derive(Debug, Default)]
pub struct MockTransport {
    outcomes: Mutex<VecDeque<Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Create a transport with nothing queued
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and body
    pub fn respond(&self, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        self.respond_with_headers(status, &[], body)
    }

    /// Queue a JSON response
    pub fn respond_json(&self, status: u16, body: &serde_json::Value) -> &Self {
        self.respond_with_headers(
            status,
            &[("content-type", "application/json")],
            body.to_string(),
        )
    }

    /// Queue a response carrying extra headers
    pub fn respond_with_headers(
        &self,
        status: u16,
        headers: &[(&str, &str)],
        body: impl Into<Vec<u8>>,
    ) -> &Self {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(
                HeaderName::from_bytes(name.as_bytes()).expect("valid header name"),
                HeaderValue::from_str(value).expect("valid header value"),
            );
        }
        self.push(Ok(HttpResponse {
            status,
            headers: map,
            body: body.into(),
        }))
    }

    /// Queue a network failure
    pub fn fail(&self, message: &str) -> &Self {
        self.push(Err(Error::Network(message.to_string())))
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn push(&self, outcome: Result<HttpResponse>) -> &Self {
        self.outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(outcome);
        self
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = request.url.clone();
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        self.outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(Error::Network(format!("no scripted response for {}", url))))
    }
}
