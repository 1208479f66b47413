use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::time::Duration;

pub const MAINNET_BASE_URL: &str = "https://api.binance.com/";
pub const TESTNET_BASE_URL: &str = "https://testnet.binance.vision/";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub testnet: bool,
    pub base_url: Option<String>,
    /// Injected as `recvWindow` into signed requests when set
    pub recv_window: Option<u64>,
    pub timeout_ms: u64,
    pub disable_beautification: bool,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeConfig", 7)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("testnet", &self.testnet)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("recv_window", &self.recv_window)?;
        state.serialize_field("timeout_ms", &self.timeout_ms)?;
        state.serialize_field("disable_beautification", &self.disable_beautification)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            api_key: String,
            secret_key: String,
            #[serde(default)]
            testnet: bool,
            base_url: Option<String>,
            recv_window: Option<u64>,
            #[serde(default = "default_timeout_ms")]
            timeout_ms: u64,
            #[serde(default)]
            disable_beautification: bool,
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.api_key),
            secret_key: Secret::new(helper.secret_key),
            testnet: helper.testnet,
            base_url: helper.base_url,
            recv_window: helper.recv_window,
            timeout_ms: helper.timeout_ms,
            disable_beautification: helper.disable_beautification,
        })
    }
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl ExchangeConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            testnet: false,
            base_url: None,
            recv_window: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            disable_beautification: false,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_API_KEY` (e.g., `BINANCE_API_KEY`)
    /// - `{PREFIX}_SECRET_KEY` (e.g., `BINANCE_SECRET_KEY`)
    /// - `{PREFIX}_TESTNET` (optional, defaults to false)
    /// - `{PREFIX}_BASE_URL` (optional)
    /// - `{PREFIX}_RECV_WINDOW` (optional, milliseconds)
    /// - `{PREFIX}_TIMEOUT_MS` (optional, defaults to 15000)
    /// - `{PREFIX}_DISABLE_BEAUTIFICATION` (optional, defaults to false)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let api_key_var = format!("{}_API_KEY", prefix);
        let secret_key_var = format!("{}_SECRET_KEY", prefix);

        let api_key = env::var(&api_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(api_key_var))?;

        let secret_key = env::var(&secret_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(secret_key_var))?;

        let testnet = env::var(format!("{}_TESTNET", prefix))
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        let base_url = env::var(format!("{}_BASE_URL", prefix)).ok();

        let recv_window = parse_optional_var::<u64>(&format!("{}_RECV_WINDOW", prefix))?;
        let timeout_ms = parse_optional_var::<u64>(&format!("{}_TIMEOUT_MS", prefix))?
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let disable_beautification =
            parse_optional_var::<bool>(&format!("{}_DISABLE_BEAUTIFICATION", prefix))?
                .unwrap_or(false);

        Ok(Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            testnet,
            base_url,
            recv_window,
            timeout_ms,
            disable_beautification,
        })
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // no .env file, fall through to system env vars
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Create configuration for public endpoints only
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(String::new(), String::new())
    }

    /// Check if an API key is set (enough for API-key endpoints)
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }

    /// Check if both the API key and the secret are set (needed for signed endpoints)
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    /// Set testnet mode
    #[must_use]
    pub const fn testnet(mut self, testnet: bool) -> Self {
        self.testnet = testnet;
        self
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set the receive window (milliseconds) for signed requests
    #[must_use]
    pub const fn recv_window(mut self, recv_window: u64) -> Self {
        self.recv_window = Some(recv_window);
        self
    }

    /// Set the per-request timeout in milliseconds
    #[must_use]
    pub const fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Return parsed payloads untouched instead of renaming abbreviated fields
    #[must_use]
    pub const fn disable_beautification(mut self, disable: bool) -> Self {
        self.disable_beautification = disable;
        self
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base URL with a guaranteed trailing slash; endpoint paths are relative
    pub fn resolved_base_url(&self) -> String {
        let base = match &self.base_url {
            Some(url) => url.clone(),
            None if self.testnet => TESTNET_BASE_URL.to_string(),
            None => MAINNET_BASE_URL.to_string(),
        };

        if base.ends_with('/') {
            base
        } else {
            format!("{}/", base)
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }

        let base = self.resolved_base_url();
        url::Url::parse(&base).map_err(|e| {
            ConfigError::InvalidConfiguration(format!("Invalid base URL '{}': {}", base, e))
        })?;

        Ok(())
    }
}

fn parse_optional_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            ConfigError::InvalidConfiguration(format!("Cannot parse {} value '{}'", name, raw))
        }),
        Err(_) => Ok(None),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExchangeConfig::new("key".to_string(), "secret".to_string());
        assert_eq!(config.timeout_ms, 15_000);
        assert_eq!(config.recv_window, None);
        assert!(!config.disable_beautification);
        assert_eq!(config.resolved_base_url(), MAINNET_BASE_URL);
        assert!(config.has_credentials());
    }

    #[test]
    fn test_base_url_resolution() {
        let testnet = ExchangeConfig::read_only().testnet(true);
        assert_eq!(testnet.resolved_base_url(), TESTNET_BASE_URL);
        assert!(!testnet.has_credentials());

        let custom = ExchangeConfig::read_only().base_url("http://127.0.0.1:9000".to_string());
        assert_eq!(custom.resolved_base_url(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn test_serialize_redacts_secrets() {
        let config = ExchangeConfig::new("my-key".to_string(), "my-secret".to_string())
            .recv_window(5000);
        let json = serde_json::to_string(&config).unwrap();

        assert!(!json.contains("my-key"));
        assert!(!json.contains("my-secret"));
        assert!(json.contains("[REDACTED]"));
        assert!(json.contains("\"recv_window\":5000"));
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: ExchangeConfig =
            serde_json::from_str(r#"{"api_key":"k","secret_key":"s","base_url":null}"#).unwrap();

        assert_eq!(config.api_key(), "k");
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(!config.testnet);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = ExchangeConfig::read_only().timeout_ms(0);
        assert!(config.validate().is_err());
        assert!(ExchangeConfig::read_only().validate().is_ok());
    }
}
