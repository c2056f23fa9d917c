//! Request timestamps for the ZB trade API.
//!
//! Every signed request carries a `reqTime` parameter with the epoch
//! milliseconds at which the request was built. The exchange rejects requests
//! whose `reqTime` is too old with code 3007.

use time::OffsetDateTime;

/// Trait for providing the `reqTime` stamped on signed requests.
pub trait RequestClock: Send + Sync {
    /// Current time in milliseconds since the UNIX epoch.
    fn now_millis(&self) -> u64;
}

/// Wall clock backed request timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl RequestClock for SystemClock {
    fn now_millis(&self) -> u64 {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
        u64::try_from(nanos / 1_000_000).unwrap_or_default()
    }
}

/// A clock frozen at a single instant, for reproducible signed requests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl RequestClock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}
