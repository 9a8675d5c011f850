//! HTTP transport used by the gateway clients

use crate::error::{PaymentError, PaymentResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Connection timeout
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("paybridge/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

/// Raw HTTP answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
}

impl TransportResponse {
    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// POSTs a request body and hands back whatever the server answered
///
/// Non-2xx answers are returned as `Ok`; only failures where no response was
/// received at all are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `body` to `url` with the given content type
    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> PaymentResult<TransportResponse>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport from configuration
    pub fn new(config: &TransportConfig) -> PaymentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| PaymentError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> PaymentResult<TransportResponse> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(url, status, bytes = body.len(), "Gateway responded");

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("paybridge/"));
    }

    #[test]
    fn test_config_builder() {
        let config = TransportConfig::default()
            .timeout(Duration::from_secs(5))
            .user_agent("shop/1.0");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "shop/1.0");
    }

    #[test]
    fn test_config_deserialize() {
        let config: TransportConfig =
            serde_json::from_str(r#"{"timeout": 12, "user_agent": "x"}"#).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.user_agent, "x");
    }

    #[test]
    fn test_status_classification() {
        let ok = TransportResponse {
            status: 200,
            body: String::new(),
        };
        let bad = TransportResponse {
            status: 503,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let transport = ReqwestTransport::new(
            &TransportConfig::default().connect_timeout(Duration::from_millis(200)),
        )
        .unwrap();
        let err = transport
            .post("http://127.0.0.1:1/", "text/xml", String::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::Transport { status: None, .. }));
    }
}
