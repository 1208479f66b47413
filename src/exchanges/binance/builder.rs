use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{HmacSigner, Signer, TransportRequest};
use crate::core::types::{Query, QueryInput, SecurityLevel};
use crate::exchanges::binance::endpoints::Endpoint;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Turns an endpoint plus caller query into a ready-to-send [`TransportRequest`]
///
/// Holds only construction-time settings; building is pure apart from reading
/// the clock for injected timestamps.
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: String,
    recv_window: Option<u64>,
    timeout: Duration,
    signer: Option<Arc<dyn Signer>>,
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("base_url", &self.base_url)
            .field("recv_window", &self.recv_window)
            .field("timeout", &self.timeout)
            .field("has_signer", &self.signer.is_some())
            .finish()
    }
}

impl RequestBuilder {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            base_url,
            recv_window: None,
            timeout,
            signer: None,
        }
    }

    /// Builder with base URL, timeout, receive window and (when present) credentials from `config`
    ///
    /// An API key without a secret still yields a signer, usable for API-key endpoints only.
    pub fn from_config(config: &ExchangeConfig) -> Self {
        let mut builder = Self::new(config.resolved_base_url(), config.timeout());
        builder.recv_window = config.recv_window;

        if config.has_api_key() {
            builder = builder.with_signer(Arc::new(HmacSigner::new(
                config.api_key().to_string(),
                config.secret_key().to_string(),
            )));
        }

        builder
    }

    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub const fn with_recv_window(mut self, recv_window: u64) -> Self {
        self.recv_window = Some(recv_window);
        self
    }

    pub fn build(
        &self,
        endpoint: &Endpoint,
        input: QueryInput,
    ) -> Result<TransportRequest, ExchangeError> {
        self.build_at(endpoint, input, current_timestamp())
    }

    /// Same as [`build`](Self::build) with an explicit clock reading for injected timestamps
    pub fn build_at(
        &self,
        endpoint: &Endpoint,
        input: QueryInput,
        timestamp_ms: i64,
    ) -> Result<TransportRequest, ExchangeError> {
        let mut query = normalize_query(endpoint, input)?;

        let signer = match (endpoint.security.requires_api_key(), &self.signer) {
            (false, _) => None,
            (true, Some(signer)) => Some(signer),
            (true, None) => {
                return Err(ExchangeError::AuthError(format!(
                    "{} requires an API key",
                    endpoint.path
                )))
            }
        };

        if endpoint.security == SecurityLevel::Signed
            && !signer.is_some_and(|signer| signer.can_sign())
        {
            return Err(ExchangeError::AuthError(format!(
                "{} requires a secret key",
                endpoint.path
            )));
        }

        if endpoint.timestamped {
            query.insert_if_absent("timestamp", timestamp_ms);
        }

        let mut url = format!("{}{}", self.base_url, endpoint.path);
        let mut headers = HashMap::new();

        match (endpoint.security, signer) {
            (SecurityLevel::Signed, Some(signer)) => {
                if let Some(recv_window) = self.recv_window {
                    query.insert_if_absent("recvWindow", recv_window);
                }

                // Everything below appends to the signed bytes, never rewrites them.
                let canonical = query.to_query_string();
                let (signed_headers, signed_params) = signer.sign_request(&canonical)?;

                url.push('?');
                url.push_str(&canonical);
                for (key, value) in signed_params {
                    if !url.ends_with('?') {
                        url.push('&');
                    }
                    url.push_str(&key);
                    url.push('=');
                    url.push_str(&value);
                }
                headers.extend(signed_headers);
            }
            (_, signer) => {
                let query_string = query.to_query_string();
                if !query_string.is_empty() {
                    url.push('?');
                    url.push_str(&query_string);
                }
                if let Some(signer) = signer {
                    headers.extend(signer.api_key_headers());
                }
            }
        }

        trace!(path = endpoint.path, params = query.len(), "Built request");

        Ok(TransportRequest {
            url,
            method: endpoint.method,
            headers,
            timeout: self.timeout,
        })
    }
}

/// Coerce the bare-string shorthand into `{primary_key: value}`
pub fn normalize_query(endpoint: &Endpoint, input: QueryInput) -> Result<Query, ExchangeError> {
    match input {
        QueryInput::Params(query) => Ok(query),
        QueryInput::Primary(value) => endpoint.primary_key.map_or_else(
            || {
                Err(ExchangeError::InvalidParameters(format!(
                    "{} does not accept a bare string argument",
                    endpoint.path
                )))
            },
            |key| Ok(Query::new().with(key.as_str(), value)),
        ),
    }
}

/// Milliseconds since the Unix epoch
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
