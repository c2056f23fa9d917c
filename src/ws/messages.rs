//! WebSocket control frames.

use serde::Serialize;

/// Event name of the subscribe control frame.
pub const ADD_CHANNEL: &str = "addChannel";

/// Control frame sent to the server, e.g. `{"event":"addChannel","channel":"btcusdt_ticker"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventMessage {
    pub event: String,
    pub channel: String,
}

impl EventMessage {
    /// Subscribe to a channel.
    pub fn add_channel(channel: impl Into<String>) -> Self {
        Self {
            event: ADD_CHANNEL.to_string(),
            channel: channel.into(),
        }
    }
}
