//! Renames abbreviated Binance field names to descriptive ones.
//!
//! Two kinds of tables exist: keyed tables rename object keys, positional
//! tables turn a row array (klines, depth levels) into an object. The table
//! for a value is picked from, in order: the explicit type, the `e` event
//! field (`"depthUpdate"` selects `depthUpdateEvent`), and for nested values
//! the already-renamed key they sit under. Anything without a table passes
//! through untouched.

use crate::core::types::Payload;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy)]
enum Table {
    Keyed(&'static [(&'static str, &'static str)]),
    Positional(&'static [&'static str]),
}

const AGG_TRADES: &[(&str, &str)] = &[
    ("a", "aggTradeId"),
    ("p", "price"),
    ("q", "quantity"),
    ("f", "firstTradeId"),
    ("l", "lastTradeId"),
    ("T", "timestamp"),
    ("m", "maker"),
    ("M", "bestPriceMatch"),
];

const KLINE_ROW: &[&str] = &[
    "openTime",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "closeTime",
    "quoteAssetVolume",
    "trades",
    "takerBaseAssetVolume",
    "takerQuoteAssetVolume",
    "ignored",
];

const DEPTH_LEVEL: &[&str] = &["price", "quantity", "ignored"];

const DEPTH_UPDATE_EVENT: &[(&str, &str)] = &[
    ("e", "eventType"),
    ("E", "eventTime"),
    ("s", "symbol"),
    ("U", "firstUpdateId"),
    ("u", "lastUpdateId"),
    ("b", "bidDepthDelta"),
    ("a", "askDepthDelta"),
];

const KLINE_EVENT: &[(&str, &str)] = &[
    ("e", "eventType"),
    ("E", "eventTime"),
    ("s", "symbol"),
    ("k", "kline"),
];

const KLINE: &[(&str, &str)] = &[
    ("t", "startTime"),
    ("T", "endTime"),
    ("s", "symbol"),
    ("i", "interval"),
    ("f", "firstTradeId"),
    ("L", "lastTradeId"),
    ("o", "open"),
    ("c", "close"),
    ("h", "high"),
    ("l", "low"),
    ("v", "volume"),
    ("n", "trades"),
    ("x", "final"),
    ("q", "quoteVolume"),
    ("V", "volumeActive"),
    ("Q", "quoteVolumeActive"),
];

const TRADE_EVENT: &[(&str, &str)] = &[
    ("e", "eventType"),
    ("E", "eventTime"),
    ("s", "symbol"),
    ("t", "tradeId"),
    ("p", "price"),
    ("q", "quantity"),
    ("b", "buyerOrderId"),
    ("a", "sellerOrderId"),
    ("T", "time"),
    ("m", "maker"),
];

const AGG_TRADE_EVENT: &[(&str, &str)] = &[
    ("e", "eventType"),
    ("E", "eventTime"),
    ("s", "symbol"),
    ("a", "tradeId"),
    ("p", "price"),
    ("q", "quantity"),
    ("f", "firstTradeId"),
    ("l", "lastTradeId"),
    ("T", "time"),
    ("m", "maker"),
];

const TICKER_EVENT: &[(&str, &str)] = &[
    ("e", "eventType"),
    ("E", "eventTime"),
    ("s", "symbol"),
    ("p", "priceChange"),
    ("P", "priceChangePercent"),
    ("w", "weightedAveragePrice"),
    ("x", "previousClose"),
    ("c", "currentClose"),
    ("Q", "closeQuantity"),
    ("b", "bestBid"),
    ("B", "bestBidQuantity"),
    ("a", "bestAskPrice"),
    ("A", "bestAskQuantity"),
    ("o", "open"),
    ("h", "high"),
    ("l", "low"),
    ("v", "baseAssetVolume"),
    ("q", "quoteAssetVolume"),
    ("O", "openTime"),
    ("C", "closeTime"),
    ("F", "firstTradeId"),
    ("L", "lastTradeId"),
    ("n", "trades"),
];

const ACCOUNT_INFO_EVENT: &[(&str, &str)] = &[
    ("e", "eventType"),
    ("E", "eventTime"),
    ("m", "makerCommission"),
    ("t", "takerCommission"),
    ("b", "buyerCommission"),
    ("s", "sellerCommission"),
    ("T", "canTrade"),
    ("W", "canWithdraw"),
    ("D", "canDeposit"),
    ("u", "lastUpdateTime"),
    ("B", "balances"),
];

const BALANCES: &[(&str, &str)] = &[
    ("a", "asset"),
    ("f", "availableBalance"),
    ("l", "onOrderBalance"),
];

const EXECUTION_REPORT_EVENT: &[(&str, &str)] = &[
    ("e", "eventType"),
    ("E", "eventTime"),
    ("s", "symbol"),
    ("c", "newClientOrderId"),
    ("S", "side"),
    ("o", "orderType"),
    ("f", "timeInForce"),
    ("q", "quantity"),
    ("p", "price"),
    ("P", "stopPrice"),
    ("F", "icebergQuantity"),
    ("g", "orderListId"),
    ("C", "originalClientOrderId"),
    ("x", "executionType"),
    ("X", "orderStatus"),
    ("r", "rejectReason"),
    ("i", "orderId"),
    ("l", "lastTradeQuantity"),
    ("z", "accumulatedQuantity"),
    ("L", "lastPrice"),
    ("n", "commission"),
    ("N", "commissionAsset"),
    ("T", "tradeTime"),
    ("t", "tradeId"),
    ("w", "isOrderWorking"),
    ("m", "maker"),
    ("O", "orderCreationTime"),
    ("Z", "cumulativeQuoteQuantity"),
    ("Y", "lastQuoteQuantity"),
    ("Q", "quoteOrderQuantity"),
];

fn table_for(kind: &str) -> Option<Table> {
    let table = match kind {
        "aggTrades" => Table::Keyed(AGG_TRADES),
        "klines" => Table::Positional(KLINE_ROW),
        "bids" | "asks" | "bidDepthDelta" | "askDepthDelta" => Table::Positional(DEPTH_LEVEL),
        "depthUpdateEvent" => Table::Keyed(DEPTH_UPDATE_EVENT),
        "klineEvent" => Table::Keyed(KLINE_EVENT),
        "kline" => Table::Keyed(KLINE),
        "tradeEvent" => Table::Keyed(TRADE_EVENT),
        "aggTradeEvent" => Table::Keyed(AGG_TRADE_EVENT),
        "24hrTickerEvent" => Table::Keyed(TICKER_EVENT),
        "outboundAccountInfoEvent" => Table::Keyed(ACCOUNT_INFO_EVENT),
        "balances" => Table::Keyed(BALANCES),
        "executionReportEvent" => Table::Keyed(EXECUTION_REPORT_EVENT),
        _ => return None,
    };
    Some(table)
}

/// Rename abbreviated keys in `value`, using `kind` to pick the top-level table
///
/// Pure and infallible: values without a matching table come back unchanged.
pub fn beautify(value: Value, kind: Option<&str>) -> Value {
    apply(value, kind.and_then(table_for))
}

/// [`beautify`] lifted to a response payload; raw text is returned as-is
pub fn beautify_payload(payload: Payload, kind: Option<&str>) -> Payload {
    match payload {
        Payload::Json(value) => Payload::Json(beautify(value, kind)),
        raw @ Payload::Raw(_) => raw,
    }
}

fn apply(value: Value, table: Option<Table>) -> Value {
    match value {
        Value::Array(items) => match table {
            Some(Table::Positional(fields)) if is_row(&items) => zip_row(items, fields),
            _ => Value::Array(items.into_iter().map(|item| apply(item, table)).collect()),
        },
        Value::Object(map) => {
            let keys = match table {
                Some(Table::Keyed(keys)) => Some(keys),
                _ => event_table(&map),
            };
            rename(map, keys)
        }
        scalar => scalar,
    }
}

// A row is a flat record; a list of rows starts with an array or object.
fn is_row(items: &[Value]) -> bool {
    items
        .first()
        .is_some_and(|first| !first.is_array() && !first.is_object())
}

fn zip_row(items: Vec<Value>, fields: &[&str]) -> Value {
    let map = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let key = fields
                .get(index)
                .map_or_else(|| index.to_string(), |field| (*field).to_string());
            (key, item)
        })
        .collect::<Map<String, Value>>();
    Value::Object(map)
}

fn event_table(map: &Map<String, Value>) -> Option<&'static [(&'static str, &'static str)]> {
    let event = map.get("e")?.as_str()?;
    match table_for(&format!("{}Event", event))? {
        Table::Keyed(keys) => Some(keys),
        Table::Positional(_) => None,
    }
}

fn rename(map: Map<String, Value>, keys: Option<&'static [(&'static str, &'static str)]>) -> Value {
    let renamed = map
        .into_iter()
        .map(|(key, child)| {
            let key = keys
                .and_then(|keys| keys.iter().find(|(short, _)| *short == key))
                .map_or(key, |(_, long)| (*long).to_string());
            let child = apply(child, table_for(&key));
            (key, child)
        })
        .collect::<Map<String, Value>>();
    Value::Object(renamed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agg_trades_keys_renamed() {
        let raw = json!({"a": 26129, "p": "0.01633102", "q": "4.70443515", "f": 27781, "l": 27781, "T": 1498793709153_u64, "m": true, "M": true});
        let pretty = beautify(raw, Some("aggTrades"));

        assert_eq!(
            pretty,
            json!({
                "aggTradeId": 26129,
                "price": "0.01633102",
                "quantity": "4.70443515",
                "firstTradeId": 27781,
                "lastTradeId": 27781,
                "timestamp": 1498793709153_u64,
                "maker": true,
                "bestPriceMatch": true
            })
        );
    }

    #[test]
    fn test_kline_row_becomes_object() {
        let row = json!([1499040000000_u64, "0.01634790", "0.80000000", "0.01575800", "0.01577100", "148976.11427815", 1499644799999_u64, "2434.19055334", 308, "1756.87402397", "28.46694368", "17928899.62484339"]);
        let pretty = beautify(row, Some("klines"));

        assert_eq!(pretty["openTime"], json!(1499040000000_u64));
        assert_eq!(pretty["close"], json!("0.01577100"));
        assert_eq!(pretty["trades"], json!(308));
        assert_eq!(pretty["ignored"], json!("17928899.62484339"));
    }

    #[test]
    fn test_extra_positional_fields_keep_index() {
        let pretty = beautify(json!(["1.0", "2.0", [], "extra"]), Some("bids"));
        assert_eq!(pretty["price"], json!("1.0"));
        assert_eq!(pretty["3"], json!("extra"));
    }

    #[test]
    fn test_depth_levels_renamed_by_key() {
        let depth = json!({
            "lastUpdateId": 1027024,
            "bids": [["4.00000000", "431.00000000", []]],
            "asks": [["4.00000200", "12.00000000", []]]
        });
        let pretty = beautify(depth, None);

        assert_eq!(pretty["lastUpdateId"], json!(1027024));
        assert_eq!(
            pretty["bids"][0],
            json!({"price": "4.00000000", "quantity": "431.00000000", "ignored": []})
        );
        assert_eq!(pretty["asks"][0]["quantity"], json!("12.00000000"));
    }

    #[test]
    fn test_event_type_selects_table() {
        let event = json!({
            "e": "kline",
            "E": 123456789,
            "s": "BNBBTC",
            "k": {"t": 123400000, "T": 123460000, "s": "BNBBTC", "i": "1m", "o": "0.0010", "x": false}
        });
        let pretty = beautify(event, None);

        assert_eq!(pretty["eventType"], json!("kline"));
        assert_eq!(pretty["eventTime"], json!(123456789));
        assert_eq!(pretty["kline"]["startTime"], json!(123400000));
        assert_eq!(pretty["kline"]["interval"], json!("1m"));
        assert_eq!(pretty["kline"]["final"], json!(false));
    }

    #[test]
    fn test_account_event_balances_renamed() {
        let event = json!({
            "e": "outboundAccountInfo",
            "E": 1,
            "m": 10,
            "B": [{"a": "LTC", "f": "17366.18", "l": "0.00"}]
        });
        let pretty = beautify(event, None);

        assert_eq!(pretty["makerCommission"], json!(10));
        assert_eq!(
            pretty["balances"][0],
            json!({"asset": "LTC", "availableBalance": "17366.18", "onOrderBalance": "0.00"})
        );
    }

    #[test]
    fn test_unknown_shapes_pass_through() {
        let price = json!({"symbol": "LTCBTC", "price": "4.00000200"});
        assert_eq!(beautify(price.clone(), None), price);
        assert_eq!(beautify(price.clone(), Some("price")), price);
        assert_eq!(beautify(json!("text"), Some("klines")), json!("text"));
        assert_eq!(beautify(json!({}), Some("aggTrades")), json!({}));
        assert!(table_for("ping").is_none());
    }

    #[test]
    fn test_beautify_is_idempotent() {
        let samples = vec![
            (json!({"a": 1, "p": "1.0", "M": true}), Some("aggTrades")),
            (json!([1, "1", "2", "0.5", "1.5", "10", 2, "15", 3, "4", "5", "0"]), Some("klines")),
            (json!({"bids": [["1", "2", []]], "asks": []}), None),
            (json!({"e": "depthUpdate", "E": 1, "b": [["1", "2", []]], "a": [["3", "4", []]]}), None),
            (json!({"e": "executionReport", "s": "ETHBTC", "X": "NEW", "I": 8641984}), None),
        ];

        for (raw, kind) in samples {
            let once = beautify(raw, kind);
            let twice = beautify(once.clone(), kind);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_raw_payload_untouched() {
        let raw = Payload::Raw("not json".to_string());
        assert_eq!(beautify_payload(raw.clone(), Some("klines")), raw);
    }
}
