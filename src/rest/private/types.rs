//! Types for trade endpoints.

use serde::Deserialize;
use time::OffsetDateTime;

use crate::types::serde_helpers::{lenient_f64, lenient_u64, lenient_u8, side_code};
use crate::types::{OrderStatus, TradeType, millis_to_datetime};

/// Account information with per-coin balances.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Account {
    pub username: String,
    pub trade_password_enabled: bool,
    pub auth_google_enabled: bool,
    pub auth_mobile_enabled: bool,
    pub assets: Vec<Asset>,
}

/// Balance of one coin.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Asset {
    /// Amount frozen in open orders.
    #[serde(rename = "freez", with = "lenient_f64", default)]
    pub freeze: f64,
    /// Amount available for trading.
    #[serde(with = "lenient_f64", default)]
    pub available: f64,
    #[serde(flatten)]
    pub coin: Coin,
}

/// Coin descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Coin {
    /// Chinese display name.
    #[serde(rename = "cnName", default)]
    pub cn_name: String,
    /// English display name.
    #[serde(rename = "enName", default)]
    pub en_name: String,
    /// Symbol key (e.g., "btc").
    #[serde(default)]
    pub key: String,
    /// Unit tag (e.g., "฿").
    #[serde(rename = "unitTag", default)]
    pub unit: String,
    /// Decimal places.
    #[serde(rename = "unitDecimal", with = "lenient_u8", default)]
    pub scale: u8,
}

/// `getAccountInfo` response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct AccountResponse {
    #[serde(default)]
    result: AccountResult,
}

#[derive(Debug, Default, Deserialize)]
struct AccountResult {
    #[serde(default)]
    coins: Vec<Asset>,
    #[serde(default)]
    base: AccountBase,
}

#[derive(Debug, Default, Deserialize)]
struct AccountBase {
    #[serde(default)]
    username: String,
    #[serde(default)]
    trade_password_enabled: bool,
    #[serde(default)]
    auth_google_enabled: bool,
    #[serde(default)]
    auth_mobile_enabled: bool,
}

impl From<AccountResponse> for Account {
    fn from(response: AccountResponse) -> Self {
        let AccountResult { coins, base } = response.result;
        Self {
            username: base.username,
            trade_password_enabled: base.trade_password_enabled,
            auth_google_enabled: base.auth_google_enabled,
            auth_mobile_enabled: base.auth_mobile_enabled,
            assets: coins,
        }
    }
}

/// An order as reported by the trade API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Order {
    #[serde(with = "lenient_u64", default)]
    pub id: u64,
    /// Limit price.
    #[serde(with = "lenient_f64", default)]
    pub price: f64,
    /// Average fill price.
    #[serde(rename = "trade_price", with = "lenient_f64", default)]
    pub average: f64,
    /// Ordered amount.
    #[serde(with = "lenient_f64", default)]
    pub total_amount: f64,
    /// Filled amount.
    #[serde(with = "lenient_f64", default)]
    pub trade_amount: f64,
    /// Filled money, the sum of amount times price over all fills.
    #[serde(with = "lenient_f64", default)]
    pub trade_money: f64,
    /// Trading pair.
    #[serde(rename = "currency", default)]
    pub symbol: String,
    pub status: OrderStatus,
    /// Order side, never [`TradeType::All`].
    #[serde(rename = "type", with = "side_code")]
    pub trade_type: TradeType,
    /// Order time in epoch milliseconds.
    #[serde(rename = "trade_date", with = "lenient_u64", default)]
    pub time: u64,
}

impl Order {
    /// Order time as a UTC datetime.
    pub fn datetime(&self) -> Option<OffsetDateTime> {
        millis_to_datetime(self.time)
    }
}

/// `order` response: the id of the placed order.
#[derive(Debug, Deserialize)]
pub(crate) struct OrderPlaced {
    #[serde(with = "lenient_u64", default)]
    pub id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_decoding() {
        let payload = json!({
            "result": {
                "coins": [{
                    "freez": "0.1",
                    "enName": "BTC",
                    "unitDecimal": 8,
                    "cnName": "BTC",
                    "unitTag": "฿",
                    "available": "1.25",
                    "key": "btc"
                }],
                "base": {
                    "username": "15206157232",
                    "trade_password_enabled": true,
                    "auth_google_enabled": false,
                    "auth_mobile_enabled": true
                }
            }
        });
        let account: Account = serde_json::from_value::<AccountResponse>(payload)
            .unwrap()
            .into();
        assert_eq!(account.username, "15206157232");
        assert!(account.trade_password_enabled);
        assert!(!account.auth_google_enabled);
        assert!(account.auth_mobile_enabled);
        assert_eq!(account.assets.len(), 1);

        let asset = &account.assets[0];
        assert_eq!(asset.freeze, 0.1);
        assert_eq!(asset.available, 1.25);
        assert_eq!(asset.coin.key, "btc");
        assert_eq!(asset.coin.unit, "฿");
        assert_eq!(asset.coin.scale, 8);
    }

    #[test]
    fn test_order_decoding() {
        let payload = json!({
            "currency": "btc_usdt",
            "id": "20180121608935",
            "price": 15000,
            "status": 3,
            "total_amount": 0.01,
            "trade_amount": 0.005,
            "trade_date": 1516029900000u64,
            "trade_money": 75.0,
            "trade_price": 15000,
            "type": 0
        });
        let order: Order = serde_json::from_value(payload).unwrap();
        assert_eq!(order.id, 20_180_121_608_935);
        assert_eq!(order.symbol, "btc_usdt");
        assert_eq!(order.price, 15000.0);
        assert_eq!(order.average, 15000.0);
        assert_eq!(order.status, OrderStatus::PartiallyFilled);
        assert_eq!(order.trade_type, TradeType::Sell);
        assert_eq!(order.total_amount, 0.01);
        assert_eq!(order.trade_amount, 0.005);
        assert_eq!(order.trade_money, 75.0);
        assert_eq!(order.time, 1_516_029_900_000);
    }

    #[test]
    fn test_order_rejects_filter_side() {
        let payload = json!({"id": "1", "status": 0, "type": -1});
        assert!(serde_json::from_value::<Order>(payload).is_err());
    }

    #[test]
    fn test_order_placed_id() {
        let payload = json!({"code": 1000, "message": "操作成功", "id": "20180122612810"});
        let placed: OrderPlaced = serde_json::from_value(payload).unwrap();
        assert_eq!(placed.id, 20_180_122_612_810);
    }
}
