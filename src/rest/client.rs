//! ZB REST API client implementation.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::{Credentials, CredentialsProvider, RequestClock};
use crate::error::ZbError;
use crate::rest::endpoints::{DATA_API_URL, TRADE_API_URL};
use crate::rest::private::{Account, Order};
use crate::rest::public::{Depth, Kline, Quote, SymbolConfig, Trade};
use crate::rest::request::{RequestBuilder, RestRequest};
use crate::rest::traits::ZbClient;
use crate::types::{KlinePeriod, TradeType};

/// The ZB REST API client.
///
/// Public market data endpoints work without credentials. Trade endpoints
/// need a credentials provider configured through [`ZbRestClient::builder()`].
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
///     println!("Last: {}", quote.last);
///     Ok(())
/// }
/// ```
///
/// For trade endpoints, provide credentials:
///
/// ```rust,no_run
/// use zb_api_client::rest::ZbRestClient;
/// use zb_api_client::auth::StaticCredentials;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let credentials = Arc::new(StaticCredentials::new("access_key", "secret_key"));
///     let client = ZbRestClient::builder()
///         .credentials(credentials)
///         .build();
///
///     let account = client.get_account().await?;
///     println!("Assets: {}", account.assets.len());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ZbRestClient {
    http_client: ClientWithMiddleware,
    requests: RequestBuilder,
    credentials: Option<Arc<dyn CredentialsProvider>>,
}

impl ZbRestClient {
    /// Create a new client with default settings.
    ///
    /// This client can only access public endpoints.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> ZbRestClientBuilder {
        ZbRestClientBuilder::new()
    }

    /// The request builder this client sends through.
    ///
    /// Useful to inspect or pre-build a signed request without sending it.
    pub fn requests(&self) -> &RequestBuilder {
        &self.requests
    }

    /// Configured credentials, required by trade endpoints.
    pub(crate) fn credentials(&self) -> Result<&Credentials, ZbError> {
        self.credentials
            .as_ref()
            .map(|provider| provider.get_credentials())
            .ok_or(ZbError::MissingCredentials)
    }

    /// Send a request and return the classified payload.
    ///
    /// The error classifier for the request's API family runs before the
    /// payload is handed back, so callers only ever decode successful bodies.
    pub async fn execute(&self, request: &RestRequest) -> Result<Value, ZbError> {
        let url = request.url()?;
        tracing::debug!(endpoint = request.endpoint(), "sending request");

        let response = self
            .http_client
            .request(request.method().clone(), url)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // ZB reports API failures in the body, so the status code is not consulted
        // beyond error context.
        let payload: Value = serde_json::from_str(&body).map_err(|e| {
            ZbError::InvalidResponse(format!(
                "Failed to parse response: {}. HTTP {}. Body: {}",
                e, status, body
            ))
        })?;

        if let Some(api_error) = request.family().classify(&payload) {
            tracing::debug!(
                endpoint = request.endpoint(),
                code = api_error.code.0,
                message = %api_error.message,
                "API returned an error"
            );
            return Err(ZbError::Api(api_error));
        }

        Ok(payload)
    }

    /// Send a request and decode the successful payload into `T`.
    pub(crate) async fn fetch<T>(&self, request: &RestRequest) -> Result<T, ZbError>
    where
        T: DeserializeOwned,
    {
        let payload = self.execute(request).await?;
        Ok(serde_json::from_value(payload)?)
    }
}

impl Default for ZbRestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ZbRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZbRestClient")
            .field("data_url", &self.requests.data_url())
            .field("trade_url", &self.requests.trade_url())
            .field("has_credentials", &self.credentials.is_some())
            .finish()
    }
}

/// Builder for [`ZbRestClient`].
pub struct ZbRestClientBuilder {
    data_url: String,
    trade_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    clock: Option<Arc<dyn RequestClock>>,
    user_agent: Option<String>,
}

impl ZbRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            data_url: DATA_API_URL.to_string(),
            trade_url: TRADE_API_URL.to_string(),
            credentials: None,
            clock: None,
            user_agent: None,
        }
    }

    /// Set the data API base URL (useful for testing with a mock server).
    pub fn data_url(mut self, url: impl Into<String>) -> Self {
        self.data_url = url.into();
        self
    }

    /// Set the trade API base URL (useful for testing with a mock server).
    pub fn trade_url(mut self, url: impl Into<String>) -> Self {
        self.trade_url = url.into();
        self
    }

    /// Set the credentials provider for trade requests.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a custom clock for the `reqTime` parameter.
    pub fn clock(mut self, clock: Arc<dyn RequestClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> ZbRestClient {
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("zb-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("zb-api-client"));
        headers.insert(USER_AGENT, header_value);

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        // Transport failures surface to the caller; no retry middleware here.
        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        let mut requests = RequestBuilder::with_urls(self.data_url, self.trade_url);
        if let Some(clock) = self.clock {
            requests = requests.with_clock(clock);
        }

        ZbRestClient {
            http_client: client,
            requests,
            credentials: self.credentials,
        }
    }
}

impl Default for ZbRestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ZbClient trait implementation.

impl ZbClient for ZbRestClient {
    async fn get_symbols(&self) -> Result<HashMap<String, SymbolConfig>, ZbError> {
        ZbRestClient::get_symbols(self).await
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, ZbError> {
        ZbRestClient::get_latest_quote(self, symbol).await
    }

    async fn get_klines(
        &self,
        symbol: &str,
        period: KlinePeriod,
        since: u64,
        size: u16,
    ) -> Result<Vec<Kline>, ZbError> {
        ZbRestClient::get_klines(self, symbol, period, since, size).await
    }

    async fn get_trades(&self, symbol: &str, since: u64) -> Result<Vec<Trade>, ZbError> {
        ZbRestClient::get_trades(self, symbol, since).await
    }

    async fn get_depth(&self, symbol: &str, size: u8) -> Result<Depth, ZbError> {
        ZbRestClient::get_depth(self, symbol, size).await
    }

    async fn get_account(&self) -> Result<Account, ZbError> {
        ZbRestClient::get_account(self).await
    }

    async fn place_order(
        &self,
        symbol: &str,
        price: f64,
        amount: f64,
        side: TradeType,
    ) -> Result<u64, ZbError> {
        ZbRestClient::place_order(self, symbol, price, amount, side).await
    }

    async fn cancel_order(&self, symbol: &str, id: u64) -> Result<(), ZbError> {
        ZbRestClient::cancel_order(self, symbol, id).await
    }

    async fn get_order(&self, symbol: &str, id: u64) -> Result<Order, ZbError> {
        ZbRestClient::get_order(self, symbol, id).await
    }

    async fn get_orders(
        &self,
        symbol: &str,
        filter: TradeType,
        page: u64,
        page_size: u16,
    ) -> Result<Vec<Order>, ZbError> {
        ZbRestClient::get_orders(self, symbol, filter, page, page_size).await
    }
}
