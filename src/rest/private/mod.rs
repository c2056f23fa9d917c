//! Trade endpoints (authentication required).
//!
//! These endpoints require credentials to be configured on the client. Every
//! request is signed and stamped with `reqTime` when it is built.

mod types;

pub use types::*;

use crate::error::ZbError;
use crate::rest::ZbRestClient;
use crate::types::TradeType;

impl ZbRestClient {
    /// Get account information and balances.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use zb_api_client::rest::ZbRestClient;
    /// use zb_api_client::auth::StaticCredentials;
    /// use std::sync::Arc;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let credentials = Arc::new(StaticCredentials::new("key", "secret"));
    ///     let client = ZbRestClient::builder().credentials(credentials).build();
    ///
    ///     let account = client.get_account().await?;
    ///     for asset in account.assets {
    ///         println!("{}: {}", asset.coin.key, asset.available);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_account(&self) -> Result<Account, ZbError> {
        let request = self.requests().account(self.credentials()?)?;
        let response: AccountResponse = self.fetch(&request).await?;
        Ok(response.into())
    }

    /// Place a limit order and return its id.
    ///
    /// `side` must be [`TradeType::Buy`] or [`TradeType::Sell`]; `All` fails
    /// with [`ZbError::InvalidTradeFilter`] before anything is sent.
    pub async fn place_order(
        &self,
        symbol: &str,
        price: f64,
        amount: f64,
        side: TradeType,
    ) -> Result<u64, ZbError> {
        let request = self
            .requests()
            .place_order(self.credentials()?, symbol, price, amount, side)?;
        let placed: OrderPlaced = self.fetch(&request).await?;
        Ok(placed.id)
    }

    /// Cancel an order.
    pub async fn cancel_order(&self, symbol: &str, id: u64) -> Result<(), ZbError> {
        let request = self
            .requests()
            .cancel_order(self.credentials()?, symbol, id)?;
        self.execute(&request).await?;
        Ok(())
    }

    /// Get a single order.
    pub async fn get_order(&self, symbol: &str, id: u64) -> Result<Order, ZbError> {
        let request = self.requests().get_order(self.credentials()?, symbol, id)?;
        self.fetch(&request).await
    }

    /// List orders of a trading pair.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Trading pair (e.g., "btc_usdt").
    /// * `filter` - [`TradeType::All`] for both sides, or a single side.
    /// * `page` - Page index.
    /// * `page_size` - Orders per page.
    pub async fn get_orders(
        &self,
        symbol: &str,
        filter: TradeType,
        page: u64,
        page_size: u16,
    ) -> Result<Vec<Order>, ZbError> {
        let request = self.requests().list_orders(
            self.credentials()?,
            symbol,
            filter,
            page,
            page_size,
        )?;
        self.fetch(&request).await
    }
}
