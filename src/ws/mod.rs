//! ZB WebSocket API client.
//!
//! Provides real-time quotes through callbacks.
//!
//! # Example
//!
//! ```rust,no_run
//! use zb_api_client::ws::ZbWsClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ZbWsClient::new();
//!     client.connect().await?;
//!
//!     client
//!         .subscribe_quote("eth_usdt", |quote| {
//!             println!("bid {} / ask {}", quote.buy, quote.sell);
//!         })
//!         .await?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     client.disconnect().await?;
//!     Ok(())
//! }
//! ```

mod client;
pub mod messages;
mod registry;

pub use client::{WS_URL, ZbWsClient};
pub use registry::{ChannelRegistry, quote_channel};
