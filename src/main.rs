use binance_rest::core::config::ExchangeConfig;
use binance_rest::exchanges::binance::create_binance_client;
use binance_rest::Query;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Public endpoints work without credentials; set BINANCE_API_KEY / BINANCE_SECRET_KEY
    // (or a .env file) to try the signed ones.
    let config = load_config();
    let has_credentials = config.has_credentials();
    let client = create_binance_client(config)?;

    println!("Server time: {}", client.time()?.await?);

    let klines = client
        .klines(
            Query::new()
                .with("symbol", "BTCUSDT")
                .with("interval", "1h")
                .with("limit", 3),
        )?
        .await?;
    println!("Latest klines: {}", klines);

    // Handler style
    let (tx, rx) = tokio::sync::oneshot::channel();
    client.ticker_price("BTCUSDT")?.then(move |result| {
        let _ = tx.send(result);
    });
    match rx.await? {
        Ok(price) => println!("BTCUSDT price: {}", price),
        Err(e) => println!("Error fetching price: {}", e),
    }

    if has_credentials {
        match client.account()?.await {
            Ok(account) => println!("Account: {}", account),
            Err(e) => println!("Error fetching account: {}", e),
        }
    }

    Ok(())
}

#[cfg(feature = "env-file")]
fn load_config() -> ExchangeConfig {
    ExchangeConfig::from_env_file("BINANCE").unwrap_or_else(|_| ExchangeConfig::read_only())
}

#[cfg(not(feature = "env-file"))]
fn load_config() -> ExchangeConfig {
    ExchangeConfig::from_env("BINANCE").unwrap_or_else(|_| ExchangeConfig::read_only())
}
