use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
use crate::core::types::{Payload, QueryInput};
use crate::exchanges::binance::beautifier;
use crate::exchanges::binance::builder::RequestBuilder;
use crate::exchanges::binance::endpoints::{self, Endpoint};
use serde_json::Value;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Binance REST client
///
/// Every endpoint method validates and assembles its request synchronously and
/// returns a [`Call`]. Precondition failures (bare string on an endpoint that
/// has no primary key, missing credentials) surface there, before any I/O.
///
/// ```rust,no_run
/// use binance_rest::{BinanceRest, ExchangeConfig};
///
/// # async fn example() -> Result<(), binance_rest::ExchangeError> {
/// let client = BinanceRest::new(ExchangeConfig::read_only())?;
///
/// // deferred style
/// let trades = client.trades("BTCUSDT")?.await?;
///
/// // handler style
/// client.depth("BTCUSDT")?.then(|result| match result {
///     Ok(depth) => println!("{}", depth),
///     Err(e) => eprintln!("{}", e),
/// });
/// # Ok(())
/// # }
/// ```
pub struct BinanceRest<R: Transport = ReqwestTransport> {
    transport: Arc<R>,
    builder: Arc<RequestBuilder>,
    beautify: bool,
}

impl<R: Transport> Clone for BinanceRest<R> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            builder: Arc::clone(&self.builder),
            beautify: self.beautify,
        }
    }
}

impl<R: Transport> std::fmt::Debug for BinanceRest<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceRest")
            .field("builder", &self.builder)
            .field("beautify", &self.beautify)
            .finish_non_exhaustive()
    }
}

impl BinanceRest<ReqwestTransport> {
    /// Create a client backed by reqwest
    pub fn new(config: ExchangeConfig) -> Result<Self, ExchangeError> {
        Self::with_transport(config, ReqwestTransport::new()?)
    }
}

impl<R: Transport + 'static> BinanceRest<R> {
    /// Create a client with a custom transport
    pub fn with_transport(config: ExchangeConfig, transport: R) -> Result<Self, ExchangeError> {
        config.validate()?;

        Ok(Self {
            transport: Arc::new(transport),
            builder: Arc::new(RequestBuilder::from_config(&config)),
            beautify: !config.disable_beautification,
        })
    }

    /// Prepare a call to an arbitrary endpoint
    pub fn call(
        &self,
        endpoint: &Endpoint,
        query: impl Into<QueryInput>,
    ) -> Result<Call<R>, ExchangeError> {
        let request = self.builder.build(endpoint, query.into())?;

        Ok(Call {
            transport: Arc::clone(&self.transport),
            request,
            endpoint: *endpoint,
            beautify: self.beautify,
        })
    }

    // Public APIs

    pub fn ping(&self) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::PING, QueryInput::default())
    }

    pub fn time(&self) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::TIME, QueryInput::default())
    }

    pub fn depth(&self, query: impl Into<QueryInput>) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::DEPTH, query)
    }

    pub fn trades(&self, query: impl Into<QueryInput>) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::TRADES, query)
    }

    pub fn historical_trades(
        &self,
        query: impl Into<QueryInput>,
    ) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::HISTORICAL_TRADES, query)
    }

    pub fn agg_trades(&self, query: impl Into<QueryInput>) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::AGG_TRADES, query)
    }

    pub fn exchange_info(&self) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::EXCHANGE_INFO, QueryInput::default())
    }

    pub fn klines(&self, query: impl Into<QueryInput>) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::KLINES, query)
    }

    pub fn ticker_24hr(&self, query: impl Into<QueryInput>) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::TICKER_24HR, query)
    }

    pub fn ticker_price(&self, query: impl Into<QueryInput>) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::TICKER_PRICE, query)
    }

    pub fn book_ticker(&self, query: impl Into<QueryInput>) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::BOOK_TICKER, query)
    }

    /// Legacy `allBookTickers`; see [`book_ticker`](Self::book_ticker) for the v3 route
    pub fn all_book_tickers(&self) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::ALL_BOOK_TICKERS, QueryInput::default())
    }

    /// Legacy `allPrices`; see [`ticker_price`](Self::ticker_price) for the v3 route
    pub fn all_prices(&self) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::ALL_PRICES, QueryInput::default())
    }

    // Private APIs

    pub fn new_order(&self, query: impl Into<QueryInput>) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::NEW_ORDER, query)
    }

    pub fn test_order(&self, query: impl Into<QueryInput>) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::TEST_ORDER, query)
    }

    pub fn query_order(&self, query: impl Into<QueryInput>) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::QUERY_ORDER, query)
    }

    pub fn cancel_order(&self, query: impl Into<QueryInput>) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::CANCEL_ORDER, query)
    }

    pub fn open_orders(&self, query: impl Into<QueryInput>) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::OPEN_ORDERS, query)
    }

    pub fn all_orders(&self, query: impl Into<QueryInput>) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::ALL_ORDERS, query)
    }

    /// Always signed with a fresh timestamp
    pub fn account(&self) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::ACCOUNT, QueryInput::default())
    }

    pub fn my_trades(&self, query: impl Into<QueryInput>) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::MY_TRADES, query)
    }

    pub fn withdraw(&self, query: impl Into<QueryInput>) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::WITHDRAW, query)
    }

    pub fn deposit_history(
        &self,
        query: impl Into<QueryInput>,
    ) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::DEPOSIT_HISTORY, query)
    }

    pub fn withdraw_history(
        &self,
        query: impl Into<QueryInput>,
    ) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::WITHDRAW_HISTORY, query)
    }

    pub fn deposit_address(
        &self,
        query: impl Into<QueryInput>,
    ) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::DEPOSIT_ADDRESS, query)
    }

    pub fn account_status(&self) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::ACCOUNT_STATUS, QueryInput::default())
    }

    pub fn start_user_data_stream(&self) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::START_USER_DATA_STREAM, QueryInput::default())
    }

    pub fn keep_alive_user_data_stream(
        &self,
        query: impl Into<QueryInput>,
    ) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::KEEP_ALIVE_USER_DATA_STREAM, query)
    }

    pub fn close_user_data_stream(
        &self,
        query: impl Into<QueryInput>,
    ) -> Result<Call<R>, ExchangeError> {
        self.call(&endpoints::CLOSE_USER_DATA_STREAM, query)
    }
}

/// A built, not yet dispatched request
///
/// Await it for the payload, or hand it a completion handler with
/// [`then`](Self::then). Both go through [`send`](Self::send).
#[must_use = "a call does nothing until it is awaited or given a handler"]
pub struct Call<R: Transport> {
    transport: Arc<R>,
    request: TransportRequest,
    endpoint: Endpoint,
    beautify: bool,
}

impl<R: Transport> std::fmt::Debug for Call<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Call")
            .field("endpoint", &self.endpoint.path)
            .field("method", &self.request.method)
            .field("beautify", &self.beautify)
            .finish_non_exhaustive()
    }
}

impl<R: Transport + 'static> Call<R> {
    /// The exact request that will be sent
    pub const fn request(&self) -> &TransportRequest {
        &self.request
    }

    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Dispatch and normalize the response
    #[instrument(skip(self), fields(endpoint = self.endpoint.path, method = %self.endpoint.method, security = %self.endpoint.security))]
    pub async fn send(self) -> Result<Payload, ExchangeError> {
        debug!("Dispatching request");
        let response = self.transport.execute(self.request).await?;
        handle_response(response, self.endpoint.kind(), self.beautify)
    }

    /// Dispatch on the current tokio runtime and deliver the result to `handler`
    ///
    /// Outside a runtime nothing is sent and the handler receives
    /// [`ExchangeError::Other`].
    pub fn then<F>(self, handler: F)
    where
        F: FnOnce(Result<Payload, ExchangeError>) + Send + 'static,
    {
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    handler(self.send().await);
                });
            }
            Err(e) => {
                warn!(endpoint = self.endpoint.path, "No tokio runtime for handler dispatch");
                handler(Err(ExchangeError::Other(format!(
                    "{} was not sent: {}",
                    self.endpoint.path, e
                ))));
            }
        }
    }
}

impl<R: Transport + 'static> IntoFuture for Call<R> {
    type Output = Result<Payload, ExchangeError>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.send())
    }
}

/// Classify a raw response and normalize its payload
///
/// Error responses keep their parsed (or raw) body untouched. On success a
/// list is beautified element-wise with the endpoint `kind`; anything else is
/// beautified without type context.
pub fn handle_response(
    response: TransportResponse,
    kind: &str,
    beautify: bool,
) -> Result<Payload, ExchangeError> {
    let status = response.status;
    let payload = Payload::from_body(&response.body);

    if !response.is_success() {
        warn!(status, "Exchange returned error response");
        return Err(ExchangeError::ApiError { status, payload });
    }

    debug!(status, raw = payload.is_raw(), "Request succeeded");

    if !beautify {
        return Ok(payload);
    }

    Ok(match payload {
        Payload::Json(Value::Array(items)) => Payload::Json(Value::Array(
            items
                .into_iter()
                .map(|item| beautifier::beautify(item, Some(kind)))
                .collect(),
        )),
        payload => beautifier::beautify_payload(payload, None),
    })
}
