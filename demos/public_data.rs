//! Example: Fetching public market data from ZB.
//!
//! Run with: cargo run --example public_data

use zb_api_client::rest::ZbRestClient;
use zb_api_client::types::KlinePeriod;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Public endpoints need no credentials
    let client = ZbRestClient::new();
    let symbol = "btc_usdt";

    println!("=== Symbols ===");
    let symbols = client.get_symbols().await?;
    println!("{} trading pairs", symbols.len());
    if let Some(config) = symbols.get(symbol) {
        println!(
            "{}: amount scale={}, price scale={}",
            symbol, config.amount_scale, config.price_scale
        );
    }

    println!("\n=== Quote ({}) ===", symbol);
    let quote = client.get_latest_quote(symbol).await?;
    println!("Last: {}  Bid: {}  Ask: {}", quote.last, quote.buy, quote.sell);
    println!("High: {}  Low: {}  Vol: {}", quote.high, quote.low, quote.volume);
    println!("Time: {:?}", quote.datetime());

    println!("\n=== K-lines ({}, 1 hour) ===", symbol);
    let since = quote.time.saturating_sub(6 * 3_600_000);
    let klines = client
        .get_klines(symbol, KlinePeriod::OneHour, since, 6)
        .await?;
    for kline in &klines {
        println!(
            "  {:?} O: {} H: {} L: {} C: {} Vol: {}",
            kline.datetime(),
            kline.open,
            kline.high,
            kline.low,
            kline.close,
            kline.volume
        );
    }

    println!("\n=== Depth ({}, size=5) ===", symbol);
    let depth = client.get_depth(symbol, 5).await?;
    println!("Asks:");
    for ask in &depth.asks {
        println!("  {} @ {}", ask.volume, ask.price);
    }
    println!("Bids:");
    for bid in &depth.bids {
        println!("  {} @ {}", bid.volume, bid.price);
    }

    println!("\n=== Recent Trades ({}) ===", symbol);
    let trades = client.get_trades(symbol, 0).await?;
    for trade in trades.iter().rev().take(5) {
        println!(
            "  #{} {} {} @ {} ({:?})",
            trade.id,
            trade.trade_type,
            trade.amount,
            trade.price,
            trade.datetime()
        );
    }

    Ok(())
}
