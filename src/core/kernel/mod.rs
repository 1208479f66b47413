//! Transport and authentication kernel
//!
//! The kernel knows how to send a fully assembled request and how to sign a
//! canonical query string. It has no knowledge of endpoints, query coercion,
//! or response beautification; those live in the exchange module.
//!
//! - [`Transport`]: one request in, one status + body out
//! - [`ReqwestTransport`]: reqwest-backed transport built via [`TransportBuilder`]
//! - [`Signer`] / [`HmacSigner`]: API-key headers and HMAC-SHA256 query signatures

pub mod rest;
pub mod signer;

pub use rest::{
    ReqwestTransport, Transport, TransportBuilder, TransportConfig, TransportRequest,
    TransportResponse,
};
pub use signer::{generate_signature, HmacSigner, SignatureResult, Signer, API_KEY_HEADER};
