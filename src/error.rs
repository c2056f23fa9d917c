//! Error types for the ZB client library.
//!
//! The exchange reports failures in two different shapes depending on the API
//! family. The public data API adds a top-level `error` string to the payload,
//! while the trade API always returns a numeric `code` (with `1000` meaning
//! success) next to a `message`. [`extract_data_error`] and
//! [`extract_trade_error`] turn those payloads into an [`ApiError`].

use serde_json::Value;
use thiserror::Error;

/// The main error type for all ZB client operations.
#[derive(Error, Debug)]
pub enum ZbError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// WebSocket protocol error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// WebSocket communication error (with message)
    #[error("WebSocket error: {0}")]
    WebSocketMsg(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// ZB API returned an error
    #[error("ZB API error: {0}")]
    Api(ApiError),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A raw trade type code outside of the known set
    #[error("Unknown trade type: {0}")]
    InvalidTradeType(i8),

    /// A trade type that is only valid as a query filter was used as an order side
    #[error("Trade type `all` is a query filter and cannot be used as an order side")]
    InvalidTradeFilter,

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A request argument the exchange cannot represent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing required credentials
    #[error("Missing credentials: access key and secret key required for trade endpoints")]
    MissingCredentials,

    /// The streaming client is not connected
    #[error("WebSocket client is not connected")]
    NotConnected,
}

/// Numeric result code used by the ZB trade API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
///
/// Codes are kept exactly as the server sent them, including values outside
/// the documented bands.
pub struct ApiCode(pub i64);

impl ApiCode {
    pub const OK: ApiCode = ApiCode(1000);
    pub const GENERAL_ERROR: ApiCode = ApiCode(1001);
    pub const INTERNAL_ERROR: ApiCode = ApiCode(1002);
    pub const AUTHENTICATION_FAILED: ApiCode = ApiCode(1003);
    pub const FUND_PASSWORD_LOCKED: ApiCode = ApiCode(1004);
    pub const INCORRECT_FUND_PASSWORD: ApiCode = ApiCode(1005);
    pub const AUTHENTICATION_AUDITING: ApiCode = ApiCode(1006);
    pub const EMPTY_CHANNEL: ApiCode = ApiCode(1007);
    pub const EMPTY_EVENT: ApiCode = ApiCode(1008);
    pub const MAINTAINED: ApiCode = ApiCode(1009);

    pub const INSUFFICIENT_QC_FUND: ApiCode = ApiCode(2001);
    pub const INSUFFICIENT_BTC_FUND: ApiCode = ApiCode(2002);
    pub const INSUFFICIENT_LTC_FUND: ApiCode = ApiCode(2003);
    pub const INSUFFICIENT_ETH_FUND: ApiCode = ApiCode(2005);
    pub const INSUFFICIENT_ETC_FUND: ApiCode = ApiCode(2006);
    pub const INSUFFICIENT_BTS_FUND: ApiCode = ApiCode(2007);
    pub const INSUFFICIENT_EOS_FUND: ApiCode = ApiCode(2008);
    pub const INSUFFICIENT_FUND: ApiCode = ApiCode(2009);

    pub const ORDER_NOT_FOUND: ApiCode = ApiCode(3001);
    pub const INVALID_PRICE: ApiCode = ApiCode(3002);
    pub const INVALID_AMOUNT: ApiCode = ApiCode(3003);
    pub const USER_NOT_FOUND: ApiCode = ApiCode(3004);
    pub const INVALID_ARGUMENT: ApiCode = ApiCode(3005);
    pub const INVALID_IP_ADDRESS: ApiCode = ApiCode(3006);
    pub const REQUEST_TIME_EXPIRED: ApiCode = ApiCode(3007);
    pub const TRADE_RECORD_NOT_FOUND: ApiCode = ApiCode(3008);

    pub const UNAVAILABLE: ApiCode = ApiCode(4001);
    pub const TOO_FREQUENT: ApiCode = ApiCode(4002);
}

impl std::fmt::Display for ApiCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ZB API error codes and messages.
///
/// These are errors returned by the ZB API itself in the response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The result code. Data API errors always carry [`ApiCode::GENERAL_ERROR`].
    pub code: ApiCode,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fail to invoke api ({}, {})", self.code, self.message)
    }
}

impl ApiError {
    /// Create a new API error from code and message.
    pub fn new(code: ApiCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Check if this is one of the 1000-band authentication errors.
    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self.code,
            ApiCode::AUTHENTICATION_FAILED
                | ApiCode::FUND_PASSWORD_LOCKED
                | ApiCode::INCORRECT_FUND_PASSWORD
                | ApiCode::AUTHENTICATION_AUDITING
        )
    }

    /// Check if this is an insufficient funds error (2000 band).
    pub fn is_insufficient_funds(&self) -> bool {
        (2000..3000).contains(&self.code.0)
    }

    /// Check if this is an order or argument validation error (3000 band).
    pub fn is_order_error(&self) -> bool {
        (3000..4000).contains(&self.code.0)
    }

    /// Check if the service refused the call (maintenance, unavailable, too frequent).
    pub fn is_unavailable(&self) -> bool {
        self.code == ApiCode::MAINTAINED || (4000..5000).contains(&self.code.0)
    }
}

/// Classify a response from the public data API.
///
/// Any top-level `error` field marks the payload as failed, including an
/// empty string. Its absence means success.
pub fn extract_data_error(payload: &Value) -> Option<ApiError> {
    let error = payload.get("error")?;
    let message = match error {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    };
    Some(ApiError::new(ApiCode::GENERAL_ERROR, message))
}

/// Classify a response from the trade API.
///
/// A missing `code` or [`ApiCode::OK`] means success. Any other value yields the
/// code together with the sibling `message`. A code that is not an integer is
/// reported as `ApiCode(0)`.
pub fn extract_trade_error(payload: &Value) -> Option<ApiError> {
    let code = payload.get("code")?;
    let code = match code {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .map(ApiCode)
    .unwrap_or(ApiCode(0));

    if code == ApiCode::OK {
        return None;
    }

    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Some(ApiError::new(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_error_present() {
        let payload = json!({"error": "Invalid market"});
        let error = extract_data_error(&payload).unwrap();
        assert_eq!(error.code, ApiCode::GENERAL_ERROR);
        assert_eq!(error.message, "Invalid market");
    }

    #[test]
    fn test_data_error_empty_but_present() {
        let payload = json!({"error": ""});
        let error = extract_data_error(&payload).unwrap();
        assert_eq!(error.code, ApiCode::GENERAL_ERROR);
        assert_eq!(error.message, "");
    }

    #[test]
    fn test_data_error_absent() {
        let payload = json!({"ticker": {"last": "1.0"}, "date": "1600000000"});
        assert!(extract_data_error(&payload).is_none());
        assert!(extract_data_error(&json!([[1, 2]])).is_none());
    }

    #[test]
    fn test_trade_error_ok_and_absent() {
        assert!(extract_trade_error(&json!({"code": 1000, "message": "success"})).is_none());
        assert!(extract_trade_error(&json!({"result": {}})).is_none());
        assert!(extract_trade_error(&json!([{"id": "1"}])).is_none());
    }

    #[test]
    fn test_trade_error_carries_code_and_message() {
        let payload = json!({"code": 2009, "message": "insufficient funds"});
        let error = extract_trade_error(&payload).unwrap();
        assert_eq!(error.code, ApiCode::INSUFFICIENT_FUND);
        assert_eq!(error.message, "insufficient funds");
        assert!(error.is_insufficient_funds());
        assert!(!error.is_order_error());
    }

    #[test]
    fn test_trade_error_string_code() {
        let payload = json!({"code": "3001", "message": "order not found"});
        let error = extract_trade_error(&payload).unwrap();
        assert_eq!(error.code, ApiCode::ORDER_NOT_FOUND);
        assert!(error.is_order_error());
    }

    #[test]
    fn test_trade_error_keeps_out_of_band_codes() {
        let error = extract_trade_error(&json!({"code": 70000, "message": "gateway"})).unwrap();
        assert_eq!(error.code, ApiCode(70000));
        assert!(!error.is_unavailable());

        let error = extract_trade_error(&json!({"code": -1, "message": "unknown"})).unwrap();
        assert_eq!(error.code, ApiCode(-1));

        let error = extract_trade_error(&json!({"code": "-2", "message": ""})).unwrap();
        assert_eq!(error.code, ApiCode(-2));
    }

    #[test]
    fn test_trade_error_non_integer_code() {
        let error = extract_trade_error(&json!({"code": "n/a", "message": "odd"})).unwrap();
        assert_eq!(error.code, ApiCode(0));
        assert_eq!(error.message, "odd");

        let error = extract_trade_error(&json!({"code": 1000.5})).unwrap();
        assert_eq!(error.code, ApiCode(0));
    }

    #[test]
    fn test_api_error_bands() {
        assert!(ApiError::new(ApiCode::TOO_FREQUENT, "").is_unavailable());
        assert!(ApiError::new(ApiCode::MAINTAINED, "").is_unavailable());
        assert!(ApiError::new(ApiCode::AUTHENTICATION_FAILED, "").is_authentication_error());
    }

    #[test]
    fn test_api_error_display() {
        let error = ApiError::new(ApiCode::INVALID_PRICE, "bad price");
        assert_eq!(error.to_string(), "fail to invoke api (3002, bad price)");
    }
}
