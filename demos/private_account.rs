//! Example: Account balances and open orders.
//!
//! Reads `ZB_ACCESS_KEY` and `ZB_SECRET_KEY` from the environment or `.env`.
//!
//! Run with: cargo run --example private_account

use std::sync::Arc;

use zb_api_client::auth::EnvCredentials;
use zb_api_client::rest::ZbRestClient;
use zb_api_client::types::TradeType;
use zb_api_client::{ApiCode, ZbError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let credentials = match EnvCredentials::try_from_env() {
        Some(creds) => Arc::new(creds),
        None => {
            println!("Set ZB_ACCESS_KEY and ZB_SECRET_KEY to run this example.");
            return Ok(());
        }
    };
    let client = ZbRestClient::builder().credentials(credentials).build();

    let account = client.get_account().await?;
    println!("=== Account: {} ===", account.username);
    let funded = account
        .assets
        .iter()
        .filter(|a| a.available > 0.0 || a.freeze > 0.0);
    for asset in funded {
        println!(
            "  {}: available={} frozen={}",
            asset.coin.en_name, asset.available, asset.freeze
        );
    }

    println!("\n=== Orders (btc_usdt) ===");
    match client.get_orders("btc_usdt", TradeType::All, 1, 10).await {
        Ok(orders) => {
            for order in orders {
                println!(
                    "  #{} {} {}/{} @ {} ({:?})",
                    order.id,
                    order.trade_type,
                    order.trade_amount,
                    order.total_amount,
                    order.price,
                    order.status
                );
            }
        }
        // The exchange reports an empty order list as "not found".
        Err(ZbError::Api(e)) if e.code == ApiCode::TRADE_RECORD_NOT_FOUND => {
            println!("  no orders");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
