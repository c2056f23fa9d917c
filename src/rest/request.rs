//! Request descriptions for the ZB REST API.
//!
//! [`RequestBuilder`] turns an operation and its arguments into a
//! [`RestRequest`]: the HTTP method, endpoint and query parameters that the
//! transport will send. Trade API requests are signed here, so building one
//! never touches the network but does read the request clock for `reqTime`.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::auth::{Credentials, QueryParams, RequestClock, SystemClock, sign_params};
use crate::error::{ApiError, ZbError, extract_data_error, extract_trade_error};
use crate::rest::endpoints::{DATA_API_URL, TRADE_API_URL, private, public};
use crate::types::{KlinePeriod, TradeType};

/// Name of the request timestamp parameter.
pub const REQ_TIME_PARAM: &str = "reqTime";

/// Which API a request targets. Each family reports errors differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFamily {
    /// Public market data API
    Data,
    /// Authenticated trade API
    Trade,
}

impl ApiFamily {
    /// Run the error classifier matching this family.
    pub fn classify(self, payload: &Value) -> Option<ApiError> {
        match self {
            ApiFamily::Data => extract_data_error(payload),
            ApiFamily::Trade => extract_trade_error(payload),
        }
    }
}

/// A fully built request, ready to hand to the HTTP transport.
#[derive(Debug, Clone)]
pub struct RestRequest {
    method: Method,
    endpoint: String,
    params: QueryParams,
    family: ApiFamily,
}

impl RestRequest {
    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Endpoint URL without the query string.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query parameters, including `sign` and `reqTime` for trade requests.
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// First value of a query parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }

    /// API family, which selects the error classifier.
    pub fn family(&self) -> ApiFamily {
        self.family
    }

    /// Full URL with the percent-encoded query string.
    pub fn url(&self) -> Result<Url, ZbError> {
        let mut url = Url::parse(&self.endpoint)?;
        let query = self.params.to_query_string()?;
        if !query.is_empty() {
            url.set_query(Some(&query));
        }
        Ok(url)
    }
}

/// Builds [`RestRequest`]s against configurable base URLs.
#[derive(Clone)]
pub struct RequestBuilder {
    data_url: String,
    trade_url: String,
    clock: Arc<dyn RequestClock>,
}

impl RequestBuilder {
    /// Create a builder for the production endpoints using the system clock.
    pub fn new() -> Self {
        Self::with_urls(DATA_API_URL, TRADE_API_URL)
    }

    /// Create a builder for custom base URLs (useful for testing with a mock server).
    pub fn with_urls(data_url: impl Into<String>, trade_url: impl Into<String>) -> Self {
        Self {
            data_url: data_url.into(),
            trade_url: trade_url.into(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock that stamps `reqTime`.
    pub fn with_clock(mut self, clock: Arc<dyn RequestClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Base URL of the public data API.
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Base URL of the trade API.
    pub fn trade_url(&self) -> &str {
        &self.trade_url
    }

    // ========== Public Endpoints ==========

    /// Trading pair configurations.
    pub fn symbols(&self) -> RestRequest {
        self.public(public::MARKETS, QueryParams::new())
    }

    /// Latest quote for `symbol`.
    pub fn latest_quote(&self, symbol: &str) -> RestRequest {
        self.public(public::TICKER, QueryParams::new().with("market", symbol))
    }

    /// K-lines for `symbol` starting at `since` (epoch milliseconds).
    pub fn klines(&self, symbol: &str, period: KlinePeriod, since: u64, size: u16) -> RestRequest {
        let params = QueryParams::new()
            .with("market", symbol)
            .with("type", period.as_str())
            .with("since", since.to_string())
            .with("size", size.to_string());
        self.public(public::KLINE, params)
    }

    /// Trades for `symbol` after the trade id cursor `since`.
    pub fn trades(&self, symbol: &str, since: u64) -> RestRequest {
        let params = QueryParams::new()
            .with("market", symbol)
            .with("since", since.to_string());
        self.public(public::TRADES, params)
    }

    /// Order book depth for `symbol`.
    pub fn depth(&self, symbol: &str, size: u8) -> RestRequest {
        let params = QueryParams::new()
            .with("market", symbol)
            .with("size", size.to_string());
        self.public(public::DEPTH, params)
    }

    // ========== Trade Endpoints ==========

    /// Account info and balances.
    pub fn account(&self, credentials: &Credentials) -> Result<RestRequest, ZbError> {
        self.private(credentials, private::GET_ACCOUNT_INFO, QueryParams::new())
    }

    /// Place a limit order. `side` must be [`TradeType::Buy`] or [`TradeType::Sell`].
    pub fn place_order(
        &self,
        credentials: &Credentials,
        symbol: &str,
        price: f64,
        amount: f64,
        side: TradeType,
    ) -> Result<RestRequest, ZbError> {
        let params = QueryParams::new()
            .with("currency", symbol)
            .with("price", format_decimal("price", price)?)
            .with("amount", format_decimal("amount", amount)?)
            .with("tradeType", side.side_param()?);
        self.private(credentials, private::ORDER, params)
    }

    /// Cancel order `id`.
    pub fn cancel_order(
        &self,
        credentials: &Credentials,
        symbol: &str,
        id: u64,
    ) -> Result<RestRequest, ZbError> {
        let params = QueryParams::new()
            .with("currency", symbol)
            .with("id", id.to_string());
        self.private(credentials, private::CANCEL_ORDER, params)
    }

    /// Look up order `id`.
    pub fn get_order(
        &self,
        credentials: &Credentials,
        symbol: &str,
        id: u64,
    ) -> Result<RestRequest, ZbError> {
        let params = QueryParams::new()
            .with("currency", symbol)
            .with("id", id.to_string());
        self.private(credentials, private::GET_ORDER, params)
    }

    /// List orders, routed by `filter`.
    ///
    /// [`TradeType::All`] uses the unfiltered listing. A side uses the
    /// side-filtered listing with the side sent as `tradeType`.
    pub fn list_orders(
        &self,
        credentials: &Credentials,
        symbol: &str,
        filter: TradeType,
        page: u64,
        page_size: u16,
    ) -> Result<RestRequest, ZbError> {
        let params = QueryParams::new()
            .with("currency", symbol)
            .with("pageIndex", page.to_string())
            .with("pageSize", page_size.to_string());

        match filter {
            TradeType::All => {
                self.private(credentials, private::GET_ORDERS_IGNORE_TRADE_TYPE, params)
            }
            TradeType::Buy | TradeType::Sell => {
                let params = params.with("tradeType", filter.side_param()?);
                self.private(credentials, private::GET_ORDERS_NEW, params)
            }
        }
    }

    fn public(&self, path: &str, params: QueryParams) -> RestRequest {
        RestRequest {
            method: Method::GET,
            endpoint: join_url(&self.data_url, path),
            params,
            family: ApiFamily::Data,
        }
    }

    fn private(
        &self,
        credentials: &Credentials,
        method: &str,
        mut params: QueryParams,
    ) -> Result<RestRequest, ZbError> {
        params.insert("accesskey", credentials.access_key.as_str());
        params.insert("method", method);
        sign_params(credentials, &mut params)?;
        // reqTime is appended after signing and is not covered by the signature.
        params.insert(REQ_TIME_PARAM, self.clock.now_millis().to_string());

        tracing::debug!(method, "built signed trade request");

        Ok(RestRequest {
            method: Method::GET,
            endpoint: join_url(&self.trade_url, method),
            params,
            family: ApiFamily::Trade,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("data_url", &self.data_url)
            .field("trade_url", &self.trade_url)
            .finish()
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

/// Shortest decimal rendering without exponent (`15000`, `0.01`).
fn format_decimal(name: &str, value: f64) -> Result<String, ZbError> {
    if !value.is_finite() {
        return Err(ZbError::InvalidArgument(format!(
            "{name} must be a finite number, got {value}"
        )));
    }
    Ok(format!("{value}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{FixedClock, SIGN_PARAM, sign};

    const NOW: u64 = 1_516_029_900_000;

    fn builder() -> RequestBuilder {
        RequestBuilder::new().with_clock(Arc::new(FixedClock(NOW)))
    }

    fn credentials() -> Credentials {
        Credentials::new("AK", "SK")
    }

    fn recompute_sign(request: &RestRequest) -> String {
        let mut unsigned = request.params().clone();
        unsigned.remove(SIGN_PARAM);
        unsigned.remove(REQ_TIME_PARAM);
        sign("SK", &unsigned).unwrap()
    }

    #[test]
    fn test_public_request_has_no_signature() {
        let request = builder().depth("btc_usdt", 10);
        assert_eq!(request.endpoint(), "http://api.zb.com/data/v1/depth");
        assert_eq!(request.family(), ApiFamily::Data);
        assert_eq!(request.param("market"), Some("btc_usdt"));
        assert_eq!(request.param("size"), Some("10"));
        assert!(request.param(SIGN_PARAM).is_none());
        assert!(request.param(REQ_TIME_PARAM).is_none());
    }

    #[test]
    fn test_klines_params() {
        let request = builder().klines("btc_usdt", KlinePeriod::FiveMinutes, NOW, 20);
        assert_eq!(
            request.url().unwrap().as_str(),
            "http://api.zb.com/data/v1/kline?market=btc_usdt&since=1516029900000&size=20&type=5min"
        );
    }

    #[test]
    fn test_symbols_url_has_no_query() {
        let request = builder().symbols();
        assert_eq!(request.url().unwrap().as_str(), "http://api.zb.com/data/v1/markets");
    }

    #[test]
    fn test_place_order_round_trip() {
        let request = builder()
            .place_order(&credentials(), "btc_usdt", 15000.0, 0.01, TradeType::Sell)
            .unwrap();

        assert_eq!(request.endpoint(), "https://trade.zb.com/api/order");
        assert_eq!(request.family(), ApiFamily::Trade);
        assert_eq!(request.param("currency"), Some("btc_usdt"));
        assert_eq!(request.param("price"), Some("15000"));
        assert_eq!(request.param("amount"), Some("0.01"));
        assert_eq!(request.param("tradeType"), Some("0"));
        assert_eq!(request.param("accesskey"), Some("AK"));
        assert_eq!(request.param("method"), Some("order"));
        assert_eq!(request.param(REQ_TIME_PARAM), Some("1516029900000"));

        let signature = request.param(SIGN_PARAM).unwrap();
        assert_eq!(signature.len(), 32);
        assert_eq!(signature, recompute_sign(&request));
    }

    #[test]
    fn test_place_order_rejects_all_filter() {
        let result = builder().place_order(&credentials(), "btc_usdt", 1.0, 1.0, TradeType::All);
        assert!(matches!(result, Err(ZbError::InvalidTradeFilter)));
    }

    #[test]
    fn test_place_order_rejects_non_finite_values() {
        for (price, amount) in [
            (f64::NAN, 1.0),
            (f64::INFINITY, 1.0),
            (15000.0, f64::NEG_INFINITY),
        ] {
            let result =
                builder().place_order(&credentials(), "btc_usdt", price, amount, TradeType::Buy);
            assert!(matches!(result, Err(ZbError::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal("price", 15000.0).unwrap(), "15000");
        assert_eq!(format_decimal("amount", 0.01).unwrap(), "0.01");
        assert_eq!(format_decimal("price", 1e21).unwrap(), "1000000000000000000000");
        let err = format_decimal("amount", f64::NAN).unwrap_err();
        assert!(err.to_string().contains("amount"));
    }

    #[test]
    fn test_list_orders_all_routes_to_unfiltered_endpoint() {
        let request = builder()
            .list_orders(&credentials(), "btc_usdt", TradeType::All, 1, 10)
            .unwrap();
        assert_eq!(request.endpoint(), "https://trade.zb.com/api/getOrdersIgnoreTradeType");
        assert_eq!(request.param("method"), Some("getOrdersIgnoreTradeType"));
        assert!(request.param("tradeType").is_none());
        assert_eq!(request.param("pageIndex"), Some("1"));
        assert_eq!(request.param("pageSize"), Some("10"));
        assert_eq!(request.param(SIGN_PARAM).unwrap(), recompute_sign(&request));
    }

    #[test]
    fn test_list_orders_side_routes_to_filtered_endpoint() {
        for (side, encoded) in [(TradeType::Buy, "1"), (TradeType::Sell, "0")] {
            let request = builder()
                .list_orders(&credentials(), "eth_usdt", side, 0, 50)
                .unwrap();
            assert_eq!(request.endpoint(), "https://trade.zb.com/api/getOrdersNew");
            assert_eq!(request.param("method"), Some("getOrdersNew"));
            assert_eq!(request.param("tradeType"), Some(encoded));
        }
    }

    #[test]
    fn test_list_orders_unknown_code_fails_before_building() {
        let result = TradeType::try_from(5).and_then(|filter| {
            builder().list_orders(&credentials(), "btc_usdt", filter, 0, 10)
        });
        assert!(matches!(result, Err(ZbError::InvalidTradeType(5))));
    }

    #[test]
    fn test_signed_url_is_percent_encoded() {
        let request = builder().cancel_order(&credentials(), "btc_usdt", 42).unwrap();
        let url = request.url().unwrap();
        assert_eq!(url.path(), "/api/cancelOrder");
        let query = url.query().unwrap();
        assert!(query.starts_with("accesskey=AK&currency=btc_usdt&id=42&method=cancelOrder&"));
        assert!(query.contains("reqTime=1516029900000"));
    }

    #[test]
    fn test_custom_base_urls() {
        let builder = RequestBuilder::with_urls("http://127.0.0.1:8080/data/v1", "http://127.0.0.1:8080/api/");
        assert_eq!(builder.latest_quote("btc_usdt").endpoint(), "http://127.0.0.1:8080/data/v1/ticker");
        assert_eq!(
            builder.account(&credentials()).unwrap().endpoint(),
            "http://127.0.0.1:8080/api/getAccountInfo"
        );
    }

    #[test]
    fn test_family_classifiers() {
        let payload = serde_json::json!({"code": 3001, "message": "not found", "error": "x"});
        assert_eq!(ApiFamily::Trade.classify(&payload).unwrap().code.0, 3001);
        assert_eq!(ApiFamily::Data.classify(&payload).unwrap().message, "x");
    }
}
