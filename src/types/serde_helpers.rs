//! Custom serde helpers for ZB's loosely typed payloads.
//!
//! ZB transmits most numbers as JSON strings to avoid float precision loss,
//! but not consistently: the same field may arrive as a string in one
//! endpoint and as a number in another. The helpers here accept both.
//!
//! Numeric helpers are lenient: a value that fails to parse decodes to zero
//! instead of failing the whole entity. This trades strictness for
//! compatibility with the exchange's inconsistent typing, so a zero price or
//! amount may mean "unparseable" rather than "zero".

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

use crate::types::TradeType;

/// Read a float from a JSON string or number, falling back to `0.0`.
pub fn value_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    }
}

/// Read an unsigned integer from a JSON string or number, falling back to `0`.
pub fn value_u64(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

/// Lenient `f64` fields.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use zb_api_client::types::serde_helpers::lenient_f64;
///
/// #[derive(Deserialize)]
/// struct Ticker {
///     #[serde(with = "lenient_f64", default)]
///     last: f64,
/// }
///
/// let ticker: Ticker = serde_json::from_str(r#"{"last":"15000.5"}"#).unwrap();
/// assert_eq!(ticker.last, 15000.5);
///
/// let ticker: Ticker = serde_json::from_str(r#"{"last":"n/a"}"#).unwrap();
/// assert_eq!(ticker.last, 0.0);
/// ```
pub mod lenient_f64 {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(value_f64(&Value::deserialize(deserializer)?))
    }
}

/// Lenient `u64` fields, used for timestamps and identifiers.
pub mod lenient_u64 {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(value_u64(&Value::deserialize(deserializer)?))
    }
}

/// Lenient `u8` fields, used for decimal scales. Out of range values decode to `0`.
pub mod lenient_u8 {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u8, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = value_u64(&Value::deserialize(deserializer)?);
        Ok(u8::try_from(value).unwrap_or_default())
    }
}

/// Order sides encoded as numeric codes (`0` sell, `1` buy).
///
/// The `All` filter code is rejected: a decoded order always has a side.
pub mod side_code {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<TradeType, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = i8::deserialize(deserializer)?;
        match TradeType::try_from(code).map_err(de::Error::custom)? {
            TradeType::All => Err(de::Error::custom("trade type `all` is not an order side")),
            side => Ok(side),
        }
    }
}

/// Trade sides encoded as names (`"buy"`, `"sell"`).
pub mod side_name {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<TradeType, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}
