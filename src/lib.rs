//! # ZB Client
//!
//! An async Rust client library for the ZB exchange REST and WebSocket APIs.
//!
//! ## Features
//!
//! - Public market data: trading pairs, quotes, k-lines, trades and depth
//! - Signed trade API: account, order placement, cancellation and queries
//! - Streaming quotes over WebSocket with per-channel callbacks
//! - Exchange error codes surfaced as typed [`ApiError`]s
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zb_api_client::rest::ZbRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ZbRestClient::new();
//!     let depth = client.get_depth("btc_usdt", 5).await?;
//!     println!("Asks: {:?}", depth.asks);
//!     Ok(())
//! }
//! ```
//!
//! ## Numeric precision
//!
//! Prices and amounts are `f64`. The exchange sends most numbers as strings;
//! a field that fails to parse decodes as zero instead of failing the whole
//! entity.

pub mod auth;
pub mod error;
pub mod rest;
pub mod types;
pub mod ws;

// Re-export commonly used types at crate root
pub use error::{ApiCode, ApiError, ZbError};
pub use rest::{ZbClient, ZbRestClient};
pub use types::common::{KlinePeriod, OrderStatus, TradeType};
pub use ws::ZbWsClient;

/// Result type alias using ZbError
pub type Result<T> = std::result::Result<T, ZbError>;
