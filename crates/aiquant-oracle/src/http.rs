//! HTTP decision-oracle adapter.

use aiquant_core::error::OracleError;
use aiquant_core::traits::DecisionOracle;
use aiquant_core::types::{MarketSnapshot, OracleDecision};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Vendor-specific request/response shaping.
///
/// Differences between oracle vendors live here as an injectable strategy
/// rather than a subclass per vendor; the HTTP plumbing stays shared and a
/// test can swap in a protocol without any network.
pub trait OracleProtocol: Send + Sync {
    /// Build the JSON request body for a snapshot.
    fn build_request(&self, snapshot: &MarketSnapshot) -> serde_json::Value;

    /// Parse a response body into a decision.
    fn parse_response(&self, body: &str) -> Result<OracleDecision, OracleError>;
}

/// Plain JSON protocol: the snapshot is the request, the response is the
/// decision.
#[derive(Debug, Clone, Default)]
pub struct JsonProtocol;

impl OracleProtocol for JsonProtocol {
    fn build_request(&self, snapshot: &MarketSnapshot) -> serde_json::Value {
        serde_json::to_value(snapshot).unwrap_or(serde_json::Value::Null)
    }

    fn parse_response(&self, body: &str) -> Result<OracleDecision, OracleError> {
        serde_json::from_str(body).map_err(|e| OracleError::MalformedResponse(e.to_string()))
    }
}

/// HTTP oracle client.
pub struct HttpOracle {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
    protocol: Box<dyn OracleProtocol>,
}

impl HttpOracle {
    /// Create a new HTTP oracle with the plain JSON protocol.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: None,
            timeout,
            protocol: Box::new(JsonProtocol),
        }
    }

    /// Set the bearer token sent with each request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Replace the request/response protocol.
    pub fn with_protocol(mut self, protocol: Box<dyn OracleProtocol>) -> Self {
        self.protocol = protocol;
        self
    }

    async fn post(&self, body: &serde_json::Value) -> Result<String, OracleError> {
        let mut request = self.client.post(&self.endpoint).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| OracleError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(1);
            return Err(OracleError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            return Err(OracleError::Api(format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| OracleError::Network(e.to_string()))
    }
}

#[async_trait]
impl DecisionOracle for HttpOracle {
    async fn decide(&self, snapshot: &MarketSnapshot) -> Result<OracleDecision, OracleError> {
        let body = self.protocol.build_request(snapshot);
        debug!(endpoint = %self.endpoint, timestamp = snapshot.metadata.timestamp, "oracle request");

        let text = tokio::time::timeout(self.timeout, self.post(&body))
            .await
            .map_err(|_| OracleError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            })??;

        self.protocol.parse_response(&text)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiquant_core::types::OracleAction;

    #[test]
    fn test_json_protocol_parses_decision() {
        let protocol = JsonProtocol;
        let decision = protocol
            .parse_response(r#"{"action":"SELL","confidence":72,"reasoning":"rejection at band"}"#)
            .unwrap();
        assert_eq!(decision.action, OracleAction::Sell);
        assert_eq!(decision.confidence, 72.0);
    }

    #[test]
    fn test_json_protocol_rejects_malformed() {
        let protocol = JsonProtocol;
        assert!(matches!(
            protocol.parse_response("not json"),
            Err(OracleError::MalformedResponse(_))
        ));
        assert!(matches!(
            protocol.parse_response(r#"{"confidence": 50}"#),
            Err(OracleError::MalformedResponse(_))
        ));
    }
}
