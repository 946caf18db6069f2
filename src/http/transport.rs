//! The wire seam: a trait over "send this request, give me status, headers,
//! body" so the service layer can be exercised without a network.

use std::time::Duration;

use thiserror::Error;

/// HTTP method subset the storefront actually uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A prepared JSON-oriented request.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl JsonRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, payload: &serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(payload.to_string()),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub(crate) fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .any(|(header, _)| header.eq_ignore_ascii_case(name))
    }
}

/// What came back over the wire, before any JSON interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl RawResponse {
    pub(crate) fn is_json(&self) -> bool {
        self.content_type.contains("application/json")
    }
}

/// Failure to get any response at all (connect, DNS, TLS, timeout, read).
#[derive(Debug, Error, Clone)]
#[error("{kind}: {detail}")]
pub struct TransportError {
    pub kind: &'static str,
    pub detail: String,
}

impl TransportError {
    pub(crate) fn classify(detail: String) -> Self {
        let lower = detail.to_ascii_lowercase();
        let kind = if lower.contains("timeout") || lower.contains("timed out") {
            "timeout"
        } else if lower.contains("tls") || lower.contains("ssl") {
            "tls"
        } else if lower.contains("dns") || lower.contains("resolve") {
            "dns"
        } else if lower.contains("connect") {
            "connection"
        } else {
            "transport"
        };
        Self { kind, detail }
    }
}

/// Executes prepared requests. Implemented by the `ureq` agent in production
/// and by scripted stubs in tests.
pub trait HttpTransport: Send + Sync {
    fn execute(&self, request: &JsonRequest) -> Result<RawResponse, TransportError>;
}

/// Blocking `ureq` transport with connect/read/write timeouts.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .user_agent(concat!("storefront-rs/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl HttpTransport for UreqTransport {
    fn execute(&self, request: &JsonRequest) -> Result<RawResponse, TransportError> {
        let mut call = match request.method {
            Method::Get => self.agent.get(&request.url),
            Method::Post => self.agent.post(&request.url),
        };
        for (name, value) in &request.headers {
            call = call.set(name, value);
        }

        let result = match &request.body {
            Some(body) => call.send_string(body),
            None => call.call(),
        };

        // A non-2xx status is still a response; only transport-level failures
        // surface as errors here.
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => {
                return Err(TransportError::classify(transport.to_string()));
            }
        };

        let status = response.status();
        let content_type = response
            .header("Content-Type")
            .unwrap_or_default()
            .to_string();
        let body = response
            .into_string()
            .map_err(|e| TransportError::classify(format!("failed to read response body: {e}")))?;

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}
