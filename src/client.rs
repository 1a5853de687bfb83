//! Typed HTTP client for the AI backend runtime.
//!
//! Consumes the base URL selected by the hosting manager. Deliberately
//! thin: one request per call, no retries, no connection babysitting.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from talking to the runtime.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL does not parse.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The offending URL.
        url: String,
        /// Parse failure detail.
        reason: String,
    },

    /// The request never completed.
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        /// Endpoint path.
        endpoint: String,
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },

    /// The runtime answered with an error status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Endpoint {
        /// Endpoint path.
        endpoint: String,
        /// Response status.
        status: StatusCode,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The reply body could not be decoded.
    #[error("Failed to decode {endpoint} reply: {source}")]
    Decode {
        /// Endpoint path.
        endpoint: String,
        /// Underlying decode error.
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    message: &'a str,
    subsystem: &'a str,
    session_id: &'a str,
}

/// Reply from the runtime's `/generate` endpoint.
///
/// Only `text` is required; everything else degrades to empty so a reply
/// from an older runtime build still parses.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateReply {
    /// Generated text.
    pub text: String,
    /// Subsystem the runtime actually routed to.
    #[serde(default)]
    pub subsystem_used: String,
    /// Model that produced the text.
    #[serde(default)]
    pub model_used: String,
    /// Keyword alerts per subsystem.
    #[serde(default)]
    pub subsystem_alerts: HashMap<String, Vec<String>>,
    /// Safety flags raised while generating.
    #[serde(default)]
    pub safety_flags: Vec<String>,
    /// Runtime-side latency in milliseconds.
    #[serde(default)]
    pub latency_ms: u64,
}

/// Client for the sidecar or dedicated-server runtime API.
pub struct RuntimeClient {
    client: reqwest::Client,
    base_url: Url,
    bearer_token: Option<SecretString>,
}

impl RuntimeClient {
    /// Create a client with the default 30 second timeout and no auth.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_options(base_url, None, DEFAULT_TIMEOUT)
    }

    /// Create a client with an optional bearer token and explicit timeout.
    pub fn with_options(
        base_url: &str,
        bearer_token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Ok(Self {
            client,
            base_url,
            bearer_token,
        })
    }

    /// Ask the runtime to generate a reply for one session turn.
    ///
    /// `subsystem` defaults to `Auto`, letting the runtime route the
    /// message itself.
    pub async fn generate(
        &self,
        session_id: &str,
        message: &str,
        subsystem: Option<&str>,
    ) -> Result<GenerateReply, ClientError> {
        let endpoint = "/generate";
        let url = self.endpoint_url(endpoint)?;

        let payload = GenerateRequest {
            message,
            subsystem: subsystem.unwrap_or("Auto"),
            session_id,
        };

        let mut request = self.client.post(url).json(&payload);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|source| ClientError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Endpoint {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|source| ClientError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })
    }

    /// Ask the runtime to pre-load the model behind `subsystem`.
    ///
    /// Returns the raw response body; its shape varies by backend.
    pub async fn warmup(&self, subsystem: &str) -> Result<String, ClientError> {
        let endpoint = "/backend/warmup";
        let mut url = self.endpoint_url(endpoint)?;
        url.query_pairs_mut().append_pair("subsystem", subsystem);

        let mut request = self.client.post(url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|source| ClientError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status.is_client_error() || status.is_server_error() {
            return Err(ClientError::Endpoint {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        Ok(body)
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(endpoint)
            .map_err(|e| ClientError::InvalidBaseUrl {
                url: format!("{}{endpoint}", self.base_url),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            RuntimeClient::new("not a url"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_generate_payload_shape() {
        let payload = GenerateRequest {
            message: "hello world",
            subsystem: "Auto",
            session_id: "session-1",
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["message"], "hello world");
        assert_eq!(json["subsystem"], "Auto");
        assert_eq!(json["session_id"], "session-1");
    }

    #[test]
    fn test_reply_parses_with_missing_optional_fields() {
        let reply: GenerateReply = serde_json::from_str(r#"{"text":"ok"}"#).unwrap();
        assert_eq!(reply.text, "ok");
        assert!(reply.subsystem_used.is_empty());
        assert!(reply.safety_flags.is_empty());
        assert_eq!(reply.latency_ms, 0);
    }

    #[test]
    fn test_endpoint_url_joins_on_the_base() {
        let client = RuntimeClient::new("http://127.0.0.1:8765").unwrap();
        let url = client.endpoint_url("/generate").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8765/generate");
    }
}
