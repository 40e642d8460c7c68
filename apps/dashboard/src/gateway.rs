//! Gateway client. The one place the dashboard talks HTTP.
//!
//! Forms, the batch executor, autocomplete and the feed all go through the
//! `Gateway` trait so they can be driven by an in-memory double in tests.

use async_trait::async_trait;
use profile_board_common::{ApiData, ApiFailure, ZERO_RESULTS};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// One HTTP call: method, path relative to the gateway root, optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            body: Some(body),
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway error (status {status}): {mssg} => {err}")]
    Api { status: u16, mssg: String, err: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    /// The gateway's "lookup matched nothing" failure.
    pub fn is_zero_results(&self) -> bool {
        matches!(self, GatewayError::Api { err, .. } if err == ZERO_RESULTS)
    }
}

/// Sends one request and returns the `data` member of the success envelope.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<Value, GatewayError>;
}

/// Sends `request` and deserializes its `data` as `T`.
pub async fn fetch<T: DeserializeOwned>(
    gateway: &dyn Gateway,
    request: &ApiRequest,
) -> Result<T, GatewayError> {
    let data = gateway.send(request).await?;
    Ok(serde_json::from_value(data)?)
}

/// `Gateway` over HTTP with `reqwest`. No retries: a failed call is reported
/// to the caller, who decides whether to resubmit.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn send(&self, request: &ApiRequest) -> Result<Value, GatewayError> {
        let url = self.url(&request.path);
        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("{} {} -> {}", request.method.as_str(), request.path, status);

        if !status.is_success() {
            let failure = serde_json::from_str::<ApiFailure>(&body).unwrap_or(ApiFailure {
                mssg: status.canonical_reason().unwrap_or("Request failed").to_string(),
                err: body,
            });
            return Err(GatewayError::Api {
                status: status.as_u16(),
                mssg: failure.mssg,
                err: failure.err,
            });
        }

        // 204 responses (deletes) carry no envelope.
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        let envelope: ApiData<Value> = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let gateway = HttpGateway::new("http://localhost:7000/").unwrap();
        assert_eq!(gateway.url("/users"), "http://localhost:7000/users");
    }

    #[test]
    fn test_zero_results_detection() {
        let zero = GatewayError::Api {
            status: 404,
            mssg: "Error getting skills".into(),
            err: ZERO_RESULTS.into(),
        };
        assert!(zero.is_zero_results());
        let other = GatewayError::Api {
            status: 500,
            mssg: "Database error".into(),
            err: "A database error occurred".into(),
        };
        assert!(!other.is_zero_results());
    }
}
