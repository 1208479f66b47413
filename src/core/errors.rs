use crate::core::types::Payload;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-2xx response. The payload is the parsed body (or the raw text when
    /// the body was not JSON) and is never beautified.
    #[error("API error: response code {status}: {payload}")]
    ApiError { status: u16, payload: Payload },

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Other error: {0}")]
    Other(String),
}

impl ExchangeError {
    /// Response body attached to an exchange error response, if any
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Self::ApiError { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// HTTP status of an exchange error response, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Exchange-specific error code (`{"code": -1021, ...}`), if the body carries one
    pub fn exchange_code(&self) -> Option<i64> {
        self.payload()
            .and_then(Payload::as_json)
            .and_then(|value| value.get("code"))
            .and_then(serde_json::Value::as_i64)
    }

    /// True when the error was raised before anything was sent
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameters(_) | Self::AuthError(_) | Self::ConfigError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_accessors() {
        let err = ExchangeError::ApiError {
            status: 418,
            payload: Payload::Json(json!({"code": -1021, "msg": "Timestamp outside window."})),
        };

        assert_eq!(err.status(), Some(418));
        assert_eq!(err.exchange_code(), Some(-1021));
        assert!(!err.is_precondition());
        assert!(err.to_string().contains("418"));
    }

    #[test]
    fn test_raw_payload_has_no_code() {
        let err = ExchangeError::ApiError {
            status: 502,
            payload: Payload::Raw("<html>Bad Gateway</html>".to_string()),
        };

        assert_eq!(err.exchange_code(), None);
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[test]
    fn test_precondition_classification() {
        assert!(ExchangeError::InvalidParameters("x".to_string()).is_precondition());
        assert!(ExchangeError::AuthError("x".to_string()).is_precondition());
        assert!(!ExchangeError::NetworkError("x".to_string()).is_precondition());
    }
}
