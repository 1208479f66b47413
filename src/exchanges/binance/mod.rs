pub mod beautifier;
pub mod builder;
pub mod client;
pub mod endpoints;

use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestTransport, TransportBuilder, TransportConfig};

// Re-export main types for easier importing
pub use beautifier::{beautify, beautify_payload};
pub use builder::RequestBuilder;
pub use client::{BinanceRest, Call};
pub use endpoints::Endpoint;

/// Create a Binance REST client backed by reqwest
pub fn create_binance_client(
    config: ExchangeConfig,
) -> Result<BinanceRest<ReqwestTransport>, ExchangeError> {
    create_binance_client_with_transport_config(config, TransportConfig::default())
}

/// Create a Binance REST client with custom transport settings (user agent, connect timeout)
pub fn create_binance_client_with_transport_config(
    config: ExchangeConfig,
    transport_config: TransportConfig,
) -> Result<BinanceRest<ReqwestTransport>, ExchangeError> {
    let transport = TransportBuilder::new(transport_config).build()?;
    BinanceRest::with_transport(config, transport)
}
