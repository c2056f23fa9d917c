//! Trait definition for the ZB REST API client.
//!
//! [`ZbClient`] abstracts the REST operations so strategies can be written
//! against a mock or a wrapping implementation.
//!
//! ```rust,ignore
//! use zb_api_client::rest::{ZbClient, ZbRestClient};
//!
//! async fn spread<C: ZbClient>(client: &C) -> Result<f64, zb_api_client::ZbError> {
//!     let quote = client.get_latest_quote("btc_usdt").await?;
//!     Ok(quote.sell - quote.buy)
//! }
//! ```

use std::collections::HashMap;
use std::future::Future;

use crate::error::ZbError;
use crate::rest::private::{Account, Order};
use crate::rest::public::{Depth, Kline, Quote, SymbolConfig, Trade};
use crate::types::{KlinePeriod, TradeType};

/// All ZB REST API operations.
pub trait ZbClient: Send + Sync {
    // ========== Public Endpoints ==========

    /// Get the decimal scales of every trading pair.
    fn get_symbols(
        &self,
    ) -> impl Future<Output = Result<HashMap<String, SymbolConfig>, ZbError>> + Send;

    /// Get the latest quote for a trading pair.
    fn get_latest_quote(&self, symbol: &str)
    -> impl Future<Output = Result<Quote, ZbError>> + Send;

    /// Get k-lines for a trading pair.
    fn get_klines(
        &self,
        symbol: &str,
        period: KlinePeriod,
        since: u64,
        size: u16,
    ) -> impl Future<Output = Result<Vec<Kline>, ZbError>> + Send;

    /// Get recent trades for a trading pair.
    fn get_trades(
        &self,
        symbol: &str,
        since: u64,
    ) -> impl Future<Output = Result<Vec<Trade>, ZbError>> + Send;

    /// Get the order book for a trading pair.
    fn get_depth(
        &self,
        symbol: &str,
        size: u8,
    ) -> impl Future<Output = Result<Depth, ZbError>> + Send;

    // ========== Trade Endpoints ==========

    /// Get account information and balances.
    fn get_account(&self) -> impl Future<Output = Result<Account, ZbError>> + Send;

    /// Place a limit order and return its id.
    fn place_order(
        &self,
        symbol: &str,
        price: f64,
        amount: f64,
        side: TradeType,
    ) -> impl Future<Output = Result<u64, ZbError>> + Send;

    /// Cancel an order.
    fn cancel_order(
        &self,
        symbol: &str,
        id: u64,
    ) -> impl Future<Output = Result<(), ZbError>> + Send;

    /// Get a single order.
    fn get_order(
        &self,
        symbol: &str,
        id: u64,
    ) -> impl Future<Output = Result<Order, ZbError>> + Send;

    /// List orders of a trading pair.
    fn get_orders(
        &self,
        symbol: &str,
        filter: TradeType,
        page: u64,
        page_size: u16,
    ) -> impl Future<Output = Result<Vec<Order>, ZbError>> + Send;
}
