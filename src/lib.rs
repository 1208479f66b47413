pub mod core;
pub mod exchanges;

pub use core::{
    config::ExchangeConfig,
    errors::ExchangeError,
    types::{Payload, Query, QueryInput},
};
pub use exchanges::binance::{BinanceRest, Call};
