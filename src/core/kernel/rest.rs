use crate::core::errors::ExchangeError;
use crate::core::types::HttpMethod;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{instrument, trace};

/// Fully assembled request handed to a [`Transport`]
///
/// `url` already contains the serialized (and, for signed endpoints, signed)
/// query string and must be sent without modification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub timeout: Duration,
}

impl TransportRequest {
    /// Query string portion of the URL, without the leading '?'
    pub fn query_string(&self) -> &str {
        self.url.split_once('?').map_or("", |(_, query)| query)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and raw body of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }
}

/// HTTP transport used by the client
///
/// Implementations send exactly one request and yield exactly one response or
/// a transport-level error. Non-2xx statuses are *not* errors at this layer.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, ExchangeError>;
}

/// Configuration for the reqwest transport
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Name used in tracing fields
    pub exchange_name: String,
    /// User agent string to include in requests
    pub user_agent: String,
    /// TCP connect timeout; the per-request timeout travels with each request
    pub connect_timeout: Option<Duration>,
}

impl TransportConfig {
    pub fn new(exchange_name: String) -> Self {
        Self {
            exchange_name,
            user_agent: concat!("binance-rest/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new("binance".to_string())
    }
}

/// Builder for creating transport instances
pub struct TransportBuilder {
    config: TransportConfig,
}

impl TransportBuilder {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    pub fn build(self) -> Result<ReqwestTransport, ExchangeError> {
        let mut builder = Client::builder().user_agent(&self.config.user_agent);
        if let Some(connect_timeout) = self.config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        let client = builder.build().map_err(|e| {
            ExchangeError::Other(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(ReqwestTransport {
            client,
            config: self.config,
        })
    }
}

/// [`Transport`] backed by reqwest
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    config: TransportConfig,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ExchangeError> {
        TransportBuilder::new(TransportConfig::default()).build()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(exchange = %self.config.exchange_name, method = %request.method))]
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, ExchangeError> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url.as_str())
            .timeout(request.timeout);

        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            ExchangeError::NetworkError(format!("Failed to read response body: {}", e))
        })?;

        trace!(status, "Response body: {}", body);

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(TransportResponse::new(200, "").is_success());
        assert!(TransportResponse::new(299, "").is_success());
        assert!(!TransportResponse::new(199, "").is_success());
        assert!(!TransportResponse::new(300, "").is_success());
        assert!(!TransportResponse::new(418, "").is_success());
    }

    #[test]
    fn test_request_accessors() {
        let mut headers = HashMap::new();
        headers.insert("X-MBX-APIKEY".to_string(), "key".to_string());
        let request = TransportRequest {
            url: "https://api.binance.com/api/v1/trades?symbol=BTCUSDT".to_string(),
            method: HttpMethod::Get,
            headers,
            timeout: Duration::from_secs(15),
        };

        assert_eq!(request.query_string(), "symbol=BTCUSDT");
        assert_eq!(request.header("x-mbx-apikey"), Some("key"));
    }

    #[test]
    fn test_builder_applies_config() {
        let transport = TransportBuilder::new(
            TransportConfig::default()
                .with_user_agent("test-agent/1.0".to_string())
                .with_connect_timeout(Duration::from_secs(5)),
        )
        .build()
        .unwrap();

        let debug = format!("{:?}", transport);
        assert!(debug.contains("test-agent/1.0"));
    }
}
