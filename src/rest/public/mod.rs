//! Public data endpoints (no authentication required).

mod types;

pub use types::*;

use std::collections::HashMap;

use crate::error::ZbError;
use crate::rest::ZbRestClient;
use crate::types::KlinePeriod;

impl ZbRestClient {
    /// Get the decimal scales of every trading pair, keyed by symbol.
    pub async fn get_symbols(&self) -> Result<HashMap<String, SymbolConfig>, ZbError> {
        self.fetch(&self.requests().symbols()).await
    }

    /// Get the latest quote for a trading pair.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use zb_api_client::rest::ZbRestClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = ZbRestClient::new();
    ///     let quote = client.get_latest_quote("btc_usdt").await?;
    ///     println!("{} / {}", quote.buy, quote.sell);
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, ZbError> {
        self.fetch(&self.requests().latest_quote(symbol)).await
    }

    /// Get k-lines for a trading pair.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Trading pair (e.g., "btc_usdt").
    /// * `period` - K-line period.
    /// * `since` - Start time in epoch milliseconds.
    /// * `size` - Maximum number of rows.
    pub async fn get_klines(
        &self,
        symbol: &str,
        period: KlinePeriod,
        since: u64,
        size: u16,
    ) -> Result<Vec<Kline>, ZbError> {
        let request = self.requests().klines(symbol, period, since, size);
        let response: KlineResponse = self.fetch(&request).await?;
        Ok(response.data)
    }

    /// Get recent trades for a trading pair.
    ///
    /// `since` is a trade id cursor; pass `0` for the latest trades.
    pub async fn get_trades(&self, symbol: &str, since: u64) -> Result<Vec<Trade>, ZbError> {
        self.fetch(&self.requests().trades(symbol, since)).await
    }

    /// Get the order book for a trading pair.
    pub async fn get_depth(&self, symbol: &str, size: u8) -> Result<Depth, ZbError> {
        self.fetch(&self.requests().depth(symbol, size)).await
    }
}
