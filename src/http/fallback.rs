//! Ordered endpoint fallback: the only retry policy in the system.

use serde_json::Value;

use super::{HttpError, HttpService, JsonRequest};

impl HttpService {
    /// POST `payload` to the first endpoint that answers.
    ///
    /// The payload is serialized once and the same body and headers are
    /// reused for every attempt. A 404 with candidates remaining advances to
    /// the next endpoint — the base is assumed not deployed there. (This
    /// knowingly conflates "wrong base URL" with an endpoint that returns
    /// 404 for this particular payload; the API has never done the latter.)
    /// A transport failure with candidates remaining likewise advances. Any
    /// other failure raises immediately, and exhausting the list raises the
    /// last recorded error.
    pub fn post_json_with_fallback(
        &self,
        endpoints: &[String],
        payload: &Value,
        context: &str,
    ) -> Result<Value, HttpError> {
        if endpoints.is_empty() {
            return Err(HttpError::NotConfigured {
                context: context.to_string(),
            });
        }

        let body = payload.to_string();
        let mut last_error = None;

        for (index, endpoint) in endpoints.iter().enumerate() {
            let more_remain = index + 1 < endpoints.len();
            let request = JsonRequest {
                method: super::Method::Post,
                url: endpoint.clone(),
                headers: Vec::new(),
                body: Some(body.clone()),
            };

            match self.fetch_json(&request) {
                Ok(value) => return Ok(value),
                Err(HttpError::Status(err)) if err.status == 404 && more_remain => {
                    tracing::warn!(
                        "{context} endpoint {endpoint} returned 404, trying the next candidate"
                    );
                    last_error = Some(HttpError::Status(err));
                }
                Err(HttpError::Transport { url, reason }) if more_remain => {
                    tracing::warn!(
                        "{context} endpoint {endpoint} was unreachable ({reason}), trying the next candidate"
                    );
                    last_error = Some(HttpError::Transport { url, reason });
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error.unwrap_or_else(|| HttpError::Exhausted {
            context: context.to_string(),
        }))
    }
}
