//! Types for public data endpoints.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use time::OffsetDateTime;

use crate::types::serde_helpers::{lenient_f64, lenient_u64, lenient_u8, side_name, value_f64, value_u64};
use crate::types::{TradeType, millis_to_datetime};

/// Decimal scales of a trading pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct SymbolConfig {
    /// Decimal places accepted for amounts.
    #[serde(rename = "amountScale", with = "lenient_u8", default)]
    pub amount_scale: u8,
    /// Decimal places accepted for prices.
    #[serde(rename = "priceScale", with = "lenient_u8", default)]
    pub price_scale: u8,
}

/// Latest 24h quote of a trading pair.
///
/// Decoded from a `ticker` object plus the sibling `date` field, which is the
/// shape of both the REST ticker response and the streaming ticker channel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(from = "QuoteFrame")]
pub struct Quote {
    /// 24h volume.
    pub volume: f64,
    /// Last trade price.
    pub last: f64,
    /// Best ask price.
    pub sell: f64,
    /// Best bid price.
    pub buy: f64,
    /// 24h high.
    pub high: f64,
    /// 24h low.
    pub low: f64,
    /// Server time in epoch milliseconds.
    pub time: u64,
}

impl Quote {
    /// Server time as a UTC datetime.
    pub fn datetime(&self) -> Option<OffsetDateTime> {
        millis_to_datetime(self.time)
    }
}

#[derive(Deserialize)]
struct QuoteFrame {
    #[serde(default)]
    ticker: TickerFields,
    #[serde(with = "lenient_u64", default)]
    date: u64,
}

#[derive(Default, Deserialize)]
struct TickerFields {
    #[serde(with = "lenient_f64", default)]
    vol: f64,
    #[serde(with = "lenient_f64", default)]
    last: f64,
    #[serde(with = "lenient_f64", default)]
    sell: f64,
    #[serde(with = "lenient_f64", default)]
    buy: f64,
    #[serde(with = "lenient_f64", default)]
    high: f64,
    #[serde(with = "lenient_f64", default)]
    low: f64,
}

impl From<QuoteFrame> for Quote {
    fn from(frame: QuoteFrame) -> Self {
        let ticker = frame.ticker;
        Self {
            volume: ticker.vol,
            last: ticker.last,
            sell: ticker.sell,
            buy: ticker.buy,
            high: ticker.high,
            low: ticker.low,
            time: frame.date,
        }
    }
}

/// One k-line (candlestick) row.
///
/// Rows arrive as `[time, open, high, low, close, volume]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Kline {
    /// Open time in epoch milliseconds.
    pub time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Kline {
    /// Open time as a UTC datetime.
    pub fn datetime(&self) -> Option<OffsetDateTime> {
        millis_to_datetime(self.time)
    }
}

impl<'de> Deserialize<'de> for Kline {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let row = Vec::<Value>::deserialize(deserializer)?;
        let float = |i: usize| row.get(i).map(value_f64).unwrap_or_default();
        Ok(Kline {
            time: row.first().map(value_u64).unwrap_or_default(),
            open: float(1),
            high: float(2),
            low: float(3),
            close: float(4),
            volume: float(5),
        })
    }
}

/// K-line response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct KlineResponse {
    #[serde(default)]
    pub data: Vec<Kline>,
}

/// A public trade.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Trade {
    /// Trade id, usable as the `since` cursor.
    #[serde(rename = "tid", with = "lenient_u64", default)]
    pub id: u64,
    /// Taker side, never [`TradeType::All`].
    #[serde(rename = "type", with = "side_name")]
    pub trade_type: TradeType,
    #[serde(with = "lenient_f64", default)]
    pub price: f64,
    #[serde(with = "lenient_f64", default)]
    pub amount: f64,
    /// Trade time as returned by the server.
    #[serde(rename = "date", with = "lenient_u64", default)]
    pub time: u64,
}

impl Trade {
    /// Trade time as a UTC datetime.
    ///
    /// The trades endpoint reports seconds rather than milliseconds.
    pub fn datetime(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(i64::try_from(self.time).ok()?).ok()
    }
}

/// One price level of the order book.
///
/// Levels arrive as `[price, volume]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DepthEntry {
    pub price: f64,
    pub volume: f64,
}

impl<'de> Deserialize<'de> for DepthEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level = Vec::<Value>::deserialize(deserializer)?;
        Ok(DepthEntry {
            price: level.first().map(value_f64).unwrap_or_default(),
            volume: level.get(1).map(value_f64).unwrap_or_default(),
        })
    }
}

/// Order book snapshot. Level order is exactly as the server sent it.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Depth {
    #[serde(default)]
    pub asks: Vec<DepthEntry>,
    #[serde(default)]
    pub bids: Vec<DepthEntry>,
    /// Server timestamp as returned by the server.
    #[serde(rename = "timestamp", with = "lenient_u64", default)]
    pub time: u64,
}

impl Depth {
    /// Server time as a UTC datetime.
    ///
    /// The depth endpoint reports seconds rather than milliseconds.
    pub fn datetime(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(i64::try_from(self.time).ok()?).ok()
    }
}
