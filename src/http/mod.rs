//! JSON-over-HTTP service: header defaults, content-type-gated parsing,
//! typed status errors, and `{data: ...}` envelope unwrapping.

mod fallback;
mod transport;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::error::Transience;

pub use transport::{HttpTransport, JsonRequest, Method, RawResponse, TransportError, UreqTransport};

/// Non-success HTTP response, carrying the status and whatever JSON payload
/// the server sent. The display message prefers the API's own wording.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct StatusError {
    pub status: u16,
    pub payload: Option<Value>,
    message: String,
}

impl StatusError {
    fn new(status: u16, payload: Option<Value>) -> Self {
        let message = payload
            .as_ref()
            .and_then(api_message)
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        Self {
            status,
            payload,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error bodies come as `{errors: [{message}]}` or `{message}`.
fn api_message(payload: &Value) -> Option<String> {
    if let Some(message) = payload
        .get("errors")
        .and_then(|errors| errors.get(0))
        .and_then(|first| first.get("message"))
        .and_then(Value::as_str)
    {
        return Some(message.to_string());
    }
    payload
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HttpError {
    #[error(transparent)]
    Status(StatusError),

    #[error("the server returned invalid JSON")]
    InvalidJson,

    #[error("request to {url} could not be sent: {reason}")]
    Transport { url: String, reason: String },

    #[error("no {context} endpoints are configured")]
    NotConfigured { context: String },

    #[error("we could not complete your {context} request")]
    Exhausted { context: String },

    #[error("the {context} response was not in the expected format")]
    UnexpectedPayload { context: &'static str },
}

impl HttpError {
    pub fn transience(&self) -> Transience {
        match self {
            HttpError::Status(err) => match err.status {
                408 | 429 | 500..=599 => Transience::Retryable,
                _ => Transience::Permanent,
            },
            HttpError::Transport { .. } => Transience::Retryable,
            HttpError::NotConfigured { .. } | HttpError::UnexpectedPayload { .. } => {
                Transience::Permanent
            }
            HttpError::InvalidJson | HttpError::Exhausted { .. } => Transience::Unknown,
        }
    }

    /// HTTP status, when the failure was a status failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status(err) => Some(err.status),
            _ => None,
        }
    }
}

/// Thin JSON service over an [`HttpTransport`].
#[derive(Clone)]
pub struct HttpService {
    transport: Arc<dyn HttpTransport>,
}

impl HttpService {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Issue `request` and decode the response.
    ///
    /// `Accept: application/json` is merged into the headers, and
    /// `Content-Type: application/json` is added when a body is present and
    /// no content type was set. The body is parsed as JSON only when the
    /// response content type says so; a non-JSON body decodes to `Null`. A
    /// non-2xx status becomes [`HttpError::Status`]. On success an object
    /// with a non-null `data` field unwraps to that field.
    pub fn fetch_json(&self, request: &JsonRequest) -> Result<Value, HttpError> {
        let mut prepared = request.clone();
        if !prepared.has_header("accept") {
            prepared
                .headers
                .push(("Accept".to_string(), "application/json".to_string()));
        }
        if prepared.body.is_some() && !prepared.has_header("content-type") {
            prepared
                .headers
                .push(("Content-Type".to_string(), "application/json".to_string()));
        }

        let response =
            self.transport
                .execute(&prepared)
                .map_err(|err| HttpError::Transport {
                    url: request.url.clone(),
                    reason: err.to_string(),
                })?;
        decode_response(response)
    }
}

fn decode_response(response: RawResponse) -> Result<Value, HttpError> {
    let payload = if response.is_json() {
        Some(serde_json::from_str::<Value>(&response.body).map_err(|_| HttpError::InvalidJson)?)
    } else {
        None
    };

    if !(200..300).contains(&response.status) {
        return Err(HttpError::Status(StatusError::new(
            response.status,
            payload,
        )));
    }

    let Some(payload) = payload else {
        return Ok(Value::Null);
    };

    if let Value::Object(map) = &payload
        && let Some(data) = map.get("data")
        && !data.is_null()
    {
        return Ok(data.clone());
    }
    Ok(payload)
}
