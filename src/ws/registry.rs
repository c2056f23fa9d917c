//! Channel registry and frame dispatch.
//!
//! Each subscription stores one type-erased handler under its channel name. The
//! handler fuses the decoder for the channel's payload with the caller's
//! callback, so dispatch only needs the channel name to route a frame.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Suffix of quote channels.
const TICKER_SUFFIX: &str = "_ticker";

/// Decodes a frame and invokes the callback. Returns `false` if decoding failed.
pub(crate) type Handler = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Derive the quote channel name of a trading pair.
///
/// ```
/// use zb_api_client::ws::quote_channel;
///
/// assert_eq!(quote_channel("btc_usdt"), "btcusdt_ticker");
/// ```
pub fn quote_channel(symbol: &str) -> String {
    let mut channel = symbol.replacen('_', "", 1);
    channel.push_str(TICKER_SUFFIX);
    channel
}

/// Mapping from channel name to handler.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct ChannelRegistry {
    handlers: Arc<RwLock<HashMap<String, Handler>>>,
}

impl ChannelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for frames of `channel`, decoded as `T`.
    ///
    /// An existing registration for the channel is replaced.
    pub fn register<T, F>(&self, channel: impl Into<String>, callback: F)
    where
        T: DeserializeOwned + 'static,
        F: Fn(T) + Send + Sync + 'static,
    {
        self.replace(channel.into(), Some(decoding_handler::<T, F>(callback)));
    }

    /// Install `handler` for `channel`, or remove the registration when it is
    /// `None`. Returns the handler that was registered before.
    pub(crate) fn replace(&self, channel: String, handler: Option<Handler>) -> Option<Handler> {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match handler {
            Some(handler) => {
                let previous = handlers.insert(channel.clone(), handler);
                if previous.is_some() {
                    tracing::trace!(channel = %channel, "Replaced channel handler");
                }
                previous
            }
            None => handlers.remove(&channel),
        }
    }

    /// Route a raw frame to its channel handler.
    ///
    /// Returns `true` when a handler decoded the frame and ran its callback to
    /// completion. Frames that are not JSON, carry no channel, target an
    /// unregistered channel or fail to decode are dropped. A panicking
    /// callback is logged and the frame counts as dropped.
    pub fn dispatch(&self, raw: &str) -> bool {
        let frame: Value = match serde_json::from_str(raw) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::trace!(error = %e, "Dropping non-JSON frame");
                return false;
            }
        };

        let channel = match frame.get("channel").and_then(Value::as_str) {
            Some(channel) => channel,
            None => {
                tracing::trace!("Dropping frame without channel");
                return false;
            }
        };

        // Clone the handler out so the lock is released before the callback runs.
        let handler = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel)
            .cloned();

        match handler {
            Some(handler) => match catch_unwind(AssertUnwindSafe(|| handler(&frame))) {
                Ok(delivered) => delivered,
                Err(_) => {
                    tracing::warn!(channel, "Channel callback panicked");
                    false
                }
            },
            None => {
                tracing::trace!(channel, "Dropping frame for unregistered channel");
                false
            }
        }
    }

    /// Remove every registration.
    pub fn clear(&self) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Names of the registered channels, sorted.
    pub fn channels(&self) -> Vec<String> {
        let mut channels: Vec<String> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        channels.sort();
        channels
    }

    pub fn is_empty(&self) -> bool {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

/// Wrap `callback` so it receives frames decoded as `T`.
pub(crate) fn decoding_handler<T, F>(callback: F) -> Handler
where
    T: DeserializeOwned + 'static,
    F: Fn(T) + Send + Sync + 'static,
{
    Arc::new(move |frame: &Value| match T::deserialize(frame) {
        Ok(value) => {
            callback(value);
            true
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to decode channel frame");
            false
        }
    })
}

impl std::fmt::Debug for ChannelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelRegistry")
            .field("channels", &self.channels())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::public::Quote;
    use std::sync::Mutex;

    const TICKER_FRAME: &str = r#"{
        "channel": "btcusdt_ticker",
        "dataType": "ticker",
        "date": "1600000000000",
        "ticker": {"vol": "12.5", "last": "10010", "sell": "10011", "buy": "10009", "high": "10100", "low": "9900"}
    }"#;

    fn recording_registry() -> (ChannelRegistry, Arc<Mutex<Vec<Quote>>>) {
        let registry = ChannelRegistry::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        registry.register::<Quote, _>(quote_channel("btc_usdt"), move |quote| {
            sink.lock().unwrap().push(quote);
        });
        (registry, received)
    }

    #[test]
    fn test_quote_channel() {
        assert_eq!(quote_channel("btc_usdt"), "btcusdt_ticker");
        assert_eq!(quote_channel("eth_usdt"), "ethusdt_ticker");
        assert_eq!(quote_channel("a_b_c"), "ab_c_ticker");
        assert_eq!(quote_channel("btcusdt"), "btcusdt_ticker");
    }

    #[test]
    fn test_dispatch_registered_channel() {
        let (registry, received) = recording_registry();

        assert!(registry.dispatch(TICKER_FRAME));

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].last, 10010.0);
        assert_eq!(received[0].buy, 10009.0);
        assert_eq!(received[0].volume, 12.5);
        assert_eq!(received[0].time, 1_600_000_000_000);
    }

    #[test]
    fn test_dispatch_drops_unknown_channel() {
        let (registry, received) = recording_registry();

        assert!(!registry.dispatch(r#"{"channel":"unknownchannel","ticker":{}}"#));
        assert!(!registry.dispatch(r#"{"ticker":{}}"#));
        assert!(!registry.dispatch(r#"{"channel":42}"#));
        assert!(!registry.dispatch("not json"));

        assert!(received.lock().unwrap().is_empty());
    }

    #[test]
    fn test_register_replaces_handler() {
        let (registry, first) = recording_registry();
        let second = Arc::new(Mutex::new(0));
        let counter = second.clone();
        registry.register::<Quote, _>("btcusdt_ticker", move |_| {
            *counter.lock().unwrap() += 1;
        });

        registry.dispatch(TICKER_FRAME);

        assert!(first.lock().unwrap().is_empty());
        assert_eq!(*second.lock().unwrap(), 1);
        assert_eq!(registry.channels(), vec!["btcusdt_ticker".to_string()]);
    }

    #[test]
    fn test_callback_can_register_during_dispatch() {
        let registry = ChannelRegistry::new();
        let inner = registry.clone();
        registry.register::<Quote, _>("btcusdt_ticker", move |_| {
            inner.register::<Quote, _>(quote_channel("eth_usdt"), |_| {});
        });

        assert!(registry.dispatch(TICKER_FRAME));
        assert_eq!(
            registry.channels(),
            vec!["btcusdt_ticker".to_string(), "ethusdt_ticker".to_string()]
        );
    }

    #[test]
    fn test_clear() {
        let (registry, received) = recording_registry();
        registry.clear();

        assert!(registry.is_empty());
        assert!(!registry.dispatch(TICKER_FRAME));
        assert!(received.lock().unwrap().is_empty());
    }

    #[test]
    fn test_panicking_callback_does_not_stop_dispatch() {
        let registry = ChannelRegistry::new();
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let sink = delivered.clone();
        registry.register::<Quote, _>("btcusdt_ticker", move |quote: Quote| {
            if quote.last < 10_000.0 {
                panic!("callback failure");
            }
            sink.lock().unwrap().push(quote.last);
        });

        let low = TICKER_FRAME.replace(r#""last": "10010""#, r#""last": "9990""#);
        assert!(!registry.dispatch(&low));
        assert!(registry.dispatch(TICKER_FRAME));

        assert_eq!(*delivered.lock().unwrap(), vec![10010.0]);
        assert_eq!(registry.channels(), vec!["btcusdt_ticker".to_string()]);
    }

    #[test]
    fn test_replace_restores_previous_handler() {
        let (registry, received) = recording_registry();
        let previous = registry.replace(
            "btcusdt_ticker".to_string(),
            Some(decoding_handler::<Quote, _>(|_| {})),
        );
        assert!(previous.is_some());

        registry.replace("btcusdt_ticker".to_string(), previous);
        assert!(registry.dispatch(TICKER_FRAME));
        assert_eq!(received.lock().unwrap().len(), 1);

        assert!(registry.replace("ethusdt_ticker".to_string(), None).is_none());
        assert!(registry.replace("btcusdt_ticker".to_string(), None).is_some());
        assert!(registry.is_empty());
    }
}
