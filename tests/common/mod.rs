//! Shared helpers for the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use binance_rest::core::errors::ExchangeError;
use binance_rest::core::kernel::{Transport, TransportRequest, TransportResponse};
use binance_rest::ExchangeConfig;
use std::sync::{Arc, Mutex};
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test_api_key";
pub const TEST_SECRET_KEY: &str = "test_secret_key";

/// Start a mock exchange
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Configuration pointing at the mock server
pub fn mock_config(server: &MockServer) -> ExchangeConfig {
    ExchangeConfig::new(TEST_API_KEY.to_string(), TEST_SECRET_KEY.to_string())
        .base_url(server.uri())
}

/// Transport that records every request and answers with a canned response
#[derive(Clone)]
pub struct RecordingTransport {
    response: Result<TransportResponse, String>,
    pub requests: Arc<Mutex<Vec<TransportRequest>>>,
}

#[allow(dead_code)]
impl RecordingTransport {
    pub fn responding(status: u16, body: &str) -> Self {
        Self {
            response: Ok(TransportResponse::new(status, body)),
            requests: Arc::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            requests: Arc::default(),
        }
    }

    pub fn recorded(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, ExchangeError> {
        self.requests.lock().unwrap().push(request);
        self.response
            .clone()
            .map_err(ExchangeError::NetworkError)
    }
}
