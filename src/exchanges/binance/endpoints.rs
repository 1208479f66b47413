use crate::core::types::HttpMethod::{Delete, Get, Post, Put};
use crate::core::types::PrimaryKey::{Asset, ListenKey, Symbol};
use crate::core::types::{HttpMethod, PrimaryKey, SecurityLevel};

/// Static description of one REST endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Path relative to the base URL, e.g. `api/v1/depth`
    pub path: &'static str,
    pub security: SecurityLevel,
    pub method: HttpMethod,
    /// Parameter a bare string argument is coerced into
    pub primary_key: Option<PrimaryKey>,
    /// Inject `timestamp` when the caller did not supply one
    pub timestamped: bool,
}

impl Endpoint {
    const fn public(path: &'static str, primary_key: Option<PrimaryKey>) -> Self {
        Self {
            path,
            security: SecurityLevel::None,
            method: HttpMethod::Get,
            primary_key,
            timestamped: false,
        }
    }

    const fn api_key(
        path: &'static str,
        method: HttpMethod,
        primary_key: Option<PrimaryKey>,
    ) -> Self {
        Self {
            path,
            security: SecurityLevel::ApiKey,
            method,
            primary_key,
            timestamped: false,
        }
    }

    const fn signed(
        path: &'static str,
        method: HttpMethod,
        primary_key: Option<PrimaryKey>,
    ) -> Self {
        Self {
            path,
            security: SecurityLevel::Signed,
            method,
            primary_key,
            timestamped: true,
        }
    }

    /// Last path segment, used as the beautifier type for list responses
    pub fn kind(&self) -> &'static str {
        self.path.rsplit('/').next().unwrap_or(self.path)
    }
}

// Market data
pub const PING: Endpoint = Endpoint::public("api/v1/ping", None);
pub const TIME: Endpoint = Endpoint::public("api/v1/time", None);
pub const DEPTH: Endpoint = Endpoint::public("api/v1/depth", Some(Symbol));
pub const TRADES: Endpoint = Endpoint::public("api/v1/trades", Some(Symbol));
pub const HISTORICAL_TRADES: Endpoint =
    Endpoint::api_key("api/v1/historicalTrades", Get, Some(Symbol));
pub const AGG_TRADES: Endpoint = Endpoint::public("api/v1/aggTrades", Some(Symbol));
pub const EXCHANGE_INFO: Endpoint = Endpoint::public("api/v1/exchangeInfo", None);
pub const KLINES: Endpoint = Endpoint::public("api/v1/klines", None);
pub const TICKER_24HR: Endpoint = Endpoint::public("api/v1/ticker/24hr", Some(Symbol));
pub const TICKER_PRICE: Endpoint = Endpoint::public("api/v3/ticker/price", Some(Symbol));
pub const BOOK_TICKER: Endpoint = Endpoint::public("api/v3/ticker/bookTicker", Some(Symbol));
pub const ALL_BOOK_TICKERS: Endpoint = Endpoint::public("api/v1/ticker/allBookTickers", None);
pub const ALL_PRICES: Endpoint = Endpoint::public("api/v1/ticker/allPrices", None);

// Trading
pub const NEW_ORDER: Endpoint = Endpoint::signed("api/v3/order", Post, None);
pub const TEST_ORDER: Endpoint = Endpoint::signed("api/v3/order/test", Post, None);
pub const QUERY_ORDER: Endpoint = Endpoint::signed("api/v3/order", Get, None);
pub const CANCEL_ORDER: Endpoint = Endpoint::signed("api/v3/order", Delete, None);
pub const OPEN_ORDERS: Endpoint = Endpoint::signed("api/v3/openOrders", Get, Some(Symbol));
pub const ALL_ORDERS: Endpoint = Endpoint::signed("api/v3/allOrders", Get, Some(Symbol));
pub const ACCOUNT: Endpoint = Endpoint::signed("api/v3/account", Get, None);
pub const MY_TRADES: Endpoint = Endpoint::signed("api/v3/myTrades", Get, Some(Symbol));

// Wallet (wapi)
pub const WITHDRAW: Endpoint = Endpoint::signed("wapi/v3/withdraw.html", Post, None);
pub const DEPOSIT_HISTORY: Endpoint =
    Endpoint::signed("wapi/v3/depositHistory.html", Get, Some(Asset));
pub const WITHDRAW_HISTORY: Endpoint =
    Endpoint::signed("wapi/v3/withdrawHistory.html", Get, Some(Asset));
pub const DEPOSIT_ADDRESS: Endpoint =
    Endpoint::signed("wapi/v3/depositAddress.html", Get, Some(Asset));
pub const ACCOUNT_STATUS: Endpoint = Endpoint::signed("wapi/v3/accountStatus.html", Get, None);

// User data stream
pub const START_USER_DATA_STREAM: Endpoint =
    Endpoint::api_key("api/v1/userDataStream", Post, None);
pub const KEEP_ALIVE_USER_DATA_STREAM: Endpoint =
    Endpoint::api_key("api/v1/userDataStream", Put, Some(ListenKey));
pub const CLOSE_USER_DATA_STREAM: Endpoint =
    Endpoint::api_key("api/v1/userDataStream", Delete, Some(ListenKey));

pub const ALL: &[Endpoint] = &[
    PING,
    TIME,
    DEPTH,
    TRADES,
    HISTORICAL_TRADES,
    AGG_TRADES,
    EXCHANGE_INFO,
    KLINES,
    TICKER_24HR,
    TICKER_PRICE,
    BOOK_TICKER,
    ALL_BOOK_TICKERS,
    ALL_PRICES,
    NEW_ORDER,
    TEST_ORDER,
    QUERY_ORDER,
    CANCEL_ORDER,
    OPEN_ORDERS,
    ALL_ORDERS,
    ACCOUNT,
    MY_TRADES,
    WITHDRAW,
    DEPOSIT_HISTORY,
    WITHDRAW_HISTORY,
    DEPOSIT_ADDRESS,
    ACCOUNT_STATUS,
    START_USER_DATA_STREAM,
    KEEP_ALIVE_USER_DATA_STREAM,
    CLOSE_USER_DATA_STREAM,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_last_segment() {
        assert_eq!(AGG_TRADES.kind(), "aggTrades");
        assert_eq!(KLINES.kind(), "klines");
        assert_eq!(TICKER_PRICE.kind(), "price");
        assert_eq!(WITHDRAW.kind(), "withdraw.html");
    }

    #[test]
    fn test_every_signed_endpoint_is_timestamped() {
        for endpoint in ALL {
            assert_eq!(
                endpoint.timestamped,
                endpoint.security == SecurityLevel::Signed,
                "{}",
                endpoint.path
            );
        }
    }

    #[test]
    fn test_path_families() {
        assert_eq!(ALL.len(), 29);
        for endpoint in ALL {
            assert!(
                endpoint.path.starts_with("api/v1/")
                    || endpoint.path.starts_with("api/v3/")
                    || (endpoint.path.starts_with("wapi/v3/") && endpoint.path.ends_with(".html")),
                "{}",
                endpoint.path
            );
        }
    }
}
