//! ZB REST API endpoint constants.

/// Base URL for the public data API.
pub const DATA_API_URL: &str = "http://api.zb.com/data/v1/";

/// Base URL for the authenticated trade API.
pub const TRADE_API_URL: &str = "https://trade.zb.com/api/";

/// Public data endpoints (no authentication required).
pub mod public {
    /// Get trading pair configurations.
    pub const MARKETS: &str = "markets";
    /// Get the latest quote.
    pub const TICKER: &str = "ticker";
    /// Get k-line data.
    pub const KLINE: &str = "kline";
    /// Get recent trades.
    pub const TRADES: &str = "trades";
    /// Get order book depth.
    pub const DEPTH: &str = "depth";
}

/// Trade endpoints (authentication required).
///
/// The path doubles as the `method` parameter the signature covers.
pub mod private {
    /// Get account info and balances.
    pub const GET_ACCOUNT_INFO: &str = "getAccountInfo";
    /// Place an order.
    pub const ORDER: &str = "order";
    /// Cancel an order.
    pub const CANCEL_ORDER: &str = "cancelOrder";
    /// Get a single order.
    pub const GET_ORDER: &str = "getOrder";
    /// List orders of both sides.
    pub const GET_ORDERS_IGNORE_TRADE_TYPE: &str = "getOrdersIgnoreTradeType";
    /// List orders of one side.
    pub const GET_ORDERS_NEW: &str = "getOrdersNew";
}
