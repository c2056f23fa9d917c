//! Example: Streaming quotes via WebSocket.
//!
//! Run with: cargo run --example ws_ticker

use std::time::Duration;

use zb_api_client::ws::ZbWsClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Connecting to ZB WebSocket...");
    let client = ZbWsClient::new();
    client.connect().await?;

    for symbol in ["btc_usdt", "eth_usdt"] {
        client
            .subscribe_quote(symbol, move |quote| {
                println!(
                    "[{}] Bid: {} | Ask: {} | Last: {} | Vol: {}",
                    symbol, quote.buy, quote.sell, quote.last, quote.volume
                );
            })
            .await?;
    }
    println!("Subscribed to {:?}", client.subscribed_channels());
    println!("Press Ctrl+C to exit.\n");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = tokio::time::sleep(Duration::from_secs(60)) => {}
    }

    client.disconnect().await?;
    println!("Connection closed.");
    Ok(())
}
