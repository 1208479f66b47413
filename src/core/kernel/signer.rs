use crate::core::errors::ExchangeError;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use std::collections::HashMap;

type HmacSha256 = Hmac<Sha256>;

pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Result type for signing operations: (headers, `query_params`)
pub type SignatureResult = Result<(HashMap<String, String>, Vec<(String, String)>), ExchangeError>;

/// Signer trait for request authentication
///
/// Implementations produce the headers and trailing query parameters an
/// authenticated request needs. The canonical query string is taken as-is;
/// signers never reorder or re-encode it.
pub trait Signer: Send + Sync {
    /// Headers for endpoints that only need the API key
    fn api_key_headers(&self) -> HashMap<String, String>;

    /// Whether this signer holds a secret and can sign `SIGNED` requests
    fn can_sign(&self) -> bool;

    /// Sign a canonical query string
    ///
    /// # Arguments
    /// * `query_string` - Serialized query (without leading '?'), exactly as it will be sent
    ///
    /// # Returns
    /// Tuple of (headers, params) where params must be appended after the query string
    fn sign_request(&self, query_string: &str) -> SignatureResult;
}

/// HMAC-SHA256 signer used for `SIGNED` endpoints
pub struct HmacSigner {
    api_key: Secret<String>,
    secret_key: Secret<String>,
}

impl HmacSigner {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
        }
    }

    /// Hex-encoded HMAC-SHA256 of `payload`
    pub fn signature(&self, payload: &str) -> Result<String, ExchangeError> {
        generate_signature(self.secret_key.expose_secret(), payload)
    }
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner").finish_non_exhaustive()
    }
}

impl Signer for HmacSigner {
    fn api_key_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            API_KEY_HEADER.to_string(),
            self.api_key.expose_secret().clone(),
        );
        headers
    }

    fn can_sign(&self) -> bool {
        !self.secret_key.expose_secret().is_empty()
    }

    fn sign_request(&self, query_string: &str) -> SignatureResult {
        let signature = self.signature(query_string)?;
        Ok((
            self.api_key_headers(),
            vec![("signature".to_string(), signature)],
        ))
    }
}

pub fn generate_signature(secret: &str, payload: &str) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Example from the Binance API documentation
    const DOC_SECRET: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
    const DOC_QUERY: &str = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
    const DOC_SIGNATURE: &str = "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71";

    #[test]
    fn test_known_answer_signature() {
        let signature = generate_signature(DOC_SECRET, DOC_QUERY).unwrap();
        assert_eq!(signature, DOC_SIGNATURE);
    }

    #[test]
    fn test_signature_is_deterministic() {
        let signer = HmacSigner::new("key".to_string(), "secret".to_string());
        let first = signer.signature("symbol=BTCUSDT&timestamp=1").unwrap();
        let second = signer.signature("symbol=BTCUSDT&timestamp=1").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_tampered_params_change_signature() {
        let signer = HmacSigner::new("key".to_string(), "secret".to_string());
        let original = signer
            .signature("symbol=BTCUSDT&quantity=1&timestamp=1")
            .unwrap();

        for tampered in [
            "symbol=ETHUSDT&quantity=1&timestamp=1",
            "symbol=BTCUSDT&quantity=2&timestamp=1",
            "symbol=BTCUSDT&quantity=1&timestamp=2",
            "symbol=BTCUSDT&quantity=1&timestamp=1&recvWindow=5000",
        ] {
            assert_ne!(signer.signature(tampered).unwrap(), original, "{}", tampered);
        }
    }

    #[test]
    fn test_sign_request_returns_header_and_signature() {
        let signer = HmacSigner::new("api-key".to_string(), DOC_SECRET.to_string());
        let (headers, params) = signer.sign_request(DOC_QUERY).unwrap();

        assert_eq!(headers.get(API_KEY_HEADER).map(String::as_str), Some("api-key"));
        assert_eq!(
            params,
            vec![("signature".to_string(), DOC_SIGNATURE.to_string())]
        );
    }

    #[test]
    fn test_debug_hides_credentials() {
        let signer = HmacSigner::new("api-key".to_string(), "top-secret".to_string());
        let debug = format!("{:?}", signer);
        assert!(!debug.contains("api-key"));
        assert!(!debug.contains("top-secret"));
    }
}
