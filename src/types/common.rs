//! Common domain types for the ZB API.

use serde::{Deserialize, Deserializer, de};
use time::OffsetDateTime;

use crate::error::ZbError;

/// Side of a trade or order, or the `All` filter when listing orders.
///
/// The exchange encodes sides as `0` (sell) and `1` (buy). `All` (`-1`) is only
/// ever sent as a query filter and never appears in a decoded trade or order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeType {
    /// Order listing filter matching both sides
    All,
    /// Sell side
    Sell,
    /// Buy side
    Buy,
}

impl TradeType {
    /// Numeric code used on the wire.
    pub fn code(self) -> i8 {
        match self {
            TradeType::All => -1,
            TradeType::Sell => 0,
            TradeType::Buy => 1,
        }
    }

    /// The `tradeType` query parameter value for an order side.
    ///
    /// The trade API expects the side rendered in base 8. `All` has no order
    /// side encoding and is rejected.
    pub fn side_param(self) -> Result<String, ZbError> {
        match self {
            TradeType::Sell | TradeType::Buy => Ok(format!("{:o}", self.code())),
            TradeType::All => Err(ZbError::InvalidTradeFilter),
        }
    }
}

impl TryFrom<i8> for TradeType {
    type Error = ZbError;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(TradeType::All),
            0 => Ok(TradeType::Sell),
            1 => Ok(TradeType::Buy),
            other => Err(ZbError::InvalidTradeType(other)),
        }
    }
}

impl std::str::FromStr for TradeType {
    type Err = ZbError;

    /// Parse the lowercase side names used by the trades endpoint.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(TradeType::Buy),
            "sell" => Ok(TradeType::Sell),
            other => Err(ZbError::InvalidResponse(format!("Unknown trade type: {other}"))),
        }
    }
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeType::All => write!(f, "all"),
            TradeType::Sell => write!(f, "sell"),
            TradeType::Buy => write!(f, "buy"),
        }
    }
}

/// Status of an order, decoded from the ordinal the trade API returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Order is open and waiting to be filled
    Pending,
    /// Order has been cancelled
    Cancelled,
    /// Order has been completely filled
    Finished,
    /// Order has been partially filled
    PartiallyFilled,
}

impl TryFrom<u8> for OrderStatus {
    type Error = ZbError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(OrderStatus::Pending),
            1 => Ok(OrderStatus::Cancelled),
            2 => Ok(OrderStatus::Finished),
            3 => Ok(OrderStatus::PartiallyFilled),
            other => Err(ZbError::InvalidResponse(format!("Unknown order status: {other}"))),
        }
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = u8::deserialize(deserializer)?;
        OrderStatus::try_from(code).map_err(de::Error::custom)
    }
}

/// K-line period accepted by the `kline` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KlinePeriod {
    OneMinute,
    ThreeMinutes,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    TwoHours,
    FourHours,
    SixHours,
    TwelveHours,
    OneDay,
    ThreeDays,
    OneWeek,
}

impl KlinePeriod {
    /// The `type` parameter value for this period.
    pub fn as_str(self) -> &'static str {
        match self {
            KlinePeriod::OneMinute => "1min",
            KlinePeriod::ThreeMinutes => "3min",
            KlinePeriod::FiveMinutes => "5min",
            KlinePeriod::FifteenMinutes => "15min",
            KlinePeriod::ThirtyMinutes => "30min",
            KlinePeriod::OneHour => "1hour",
            KlinePeriod::TwoHours => "2hour",
            KlinePeriod::FourHours => "4hour",
            KlinePeriod::SixHours => "6hour",
            KlinePeriod::TwelveHours => "12hour",
            KlinePeriod::OneDay => "1day",
            KlinePeriod::ThreeDays => "3day",
            KlinePeriod::OneWeek => "1week",
        }
    }
}

impl std::fmt::Display for KlinePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert exchange epoch milliseconds into a UTC datetime.
///
/// Returns `None` when the value is outside the range `time` can represent.
pub fn millis_to_datetime(millis: u64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
}
