//! WebSocket client implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::ZbError;
use crate::rest::public::Quote;
use crate::ws::messages::EventMessage;
use crate::ws::registry::{ChannelRegistry, decoding_handler, quote_channel};

/// Default WebSocket endpoint.
pub const WS_URL: &str = "wss://api.zb.com:9999/websocket";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;
type WsReceiver = SplitStream<WsStream>;

/// A live connection.
struct Session {
    id: u64,
    sink: WsSink,
    shutdown: oneshot::Sender<()>,
    reader: JoinHandle<()>,
}

enum ConnectionState {
    Disconnected,
    Running(Session),
}

struct Shared {
    state: Mutex<ConnectionState>,
    registry: ChannelRegistry,
    sessions: AtomicU64,
}

impl Shared {
    /// Move `session` to Disconnected if it is still the current one.
    ///
    /// Returns the session that was torn down, so only one caller ever sees it.
    async fn take_session(&self, session: Option<u64>) -> Option<Session> {
        let mut state = self.state.lock().await;
        let current = match &*state {
            ConnectionState::Running(current) => current.id,
            ConnectionState::Disconnected => return None,
        };
        if session.is_some_and(|id| id != current) {
            return None;
        }

        match std::mem::replace(&mut *state, ConnectionState::Disconnected) {
            ConnectionState::Running(taken) => {
                self.registry.clear();
                Some(taken)
            }
            ConnectionState::Disconnected => None,
        }
    }
}

/// ZB streaming client.
///
/// Frames are read on a background task and routed to the callbacks
/// registered through the `subscribe_*` methods. Callbacks run on that task in
/// arrival order, so a slow callback delays every later frame.
///
/// Cloning yields another handle to the same connection.
///
/// # Example
///
/// ```rust,no_run
/// use zb_api_client::ws::ZbWsClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = ZbWsClient::new();
///     client.connect().await?;
///     client
///         .subscribe_quote("btc_usdt", |quote| println!("last: {}", quote.last))
///         .await?;
///
///     tokio::time::sleep(std::time::Duration::from_secs(10)).await;
///     client.disconnect().await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ZbWsClient {
    url: String,
    shared: Arc<Shared>,
}

impl ZbWsClient {
    /// Create a client for the default endpoint.
    pub fn new() -> Self {
        Self::with_url(WS_URL)
    }

    /// Create a client with a custom URL (useful for testing).
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            shared: Arc::new(Shared {
                state: Mutex::new(ConnectionState::Disconnected),
                registry: ChannelRegistry::new(),
                sessions: AtomicU64::new(0),
            }),
        }
    }

    /// Get the WebSocket URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Open the connection and start the read loop.
    ///
    /// Does nothing if the client is already connected.
    pub async fn connect(&self) -> Result<(), ZbError> {
        let mut state = self.shared.state.lock().await;
        if matches!(*state, ConnectionState::Running(_)) {
            tracing::debug!(url = %self.url, "Already connected");
            return Ok(());
        }

        let (ws_stream, _) = connect_async(self.url.as_str()).await.map_err(|e| {
            ZbError::WebSocketMsg(format!("Failed to connect to {}: {}", self.url, e))
        })?;
        let (sink, receiver) = ws_stream.split();

        let id = self.shared.sessions.fetch_add(1, Ordering::Relaxed) + 1;
        let (shutdown, shutdown_rx) = oneshot::channel();
        let reader = tokio::spawn(read_loop(receiver, shutdown_rx, self.shared.clone(), id));

        *state = ConnectionState::Running(Session {
            id,
            sink,
            shutdown,
            reader,
        });
        tracing::info!(url = %self.url, session = id, "WebSocket connected");
        Ok(())
    }

    /// Close the connection and stop the read loop.
    ///
    /// All subscriptions are dropped. Does nothing if the client is not
    /// connected.
    pub async fn disconnect(&self) -> Result<(), ZbError> {
        let Some(session) = self.shared.take_session(None).await else {
            return Ok(());
        };
        let Session {
            id,
            mut sink,
            shutdown,
            reader,
        } = session;

        if shutdown.send(()).is_err() {
            tracing::debug!(session = id, "Read loop already stopped");
        }
        if let Err(e) = sink.send(WsMessage::Close(None)).await {
            tracing::debug!(session = id, "Failed to send close frame: {}", e);
        }
        if let Err(e) = reader.await {
            tracing::warn!(session = id, "Read loop failed: {}", e);
        }

        tracing::info!(url = %self.url, session = id, "WebSocket disconnected");
        Ok(())
    }

    /// Subscribe to the quote channel of a trading pair.
    ///
    /// `callback` replaces any earlier callback for the same pair. It runs on
    /// the read loop and must not block. If the subscription frame cannot be
    /// sent, the registration the pair had before is put back.
    pub async fn subscribe_quote<F>(&self, symbol: &str, callback: F) -> Result<(), ZbError>
    where
        F: Fn(Quote) + Send + Sync + 'static,
    {
        let channel = quote_channel(symbol);

        let mut state = self.shared.state.lock().await;
        let ConnectionState::Running(session) = &mut *state else {
            return Err(ZbError::NotConnected);
        };

        let frame = serde_json::to_string(&EventMessage::add_channel(channel.as_str()))?;
        let previous = self
            .shared
            .registry
            .replace(channel.clone(), Some(decoding_handler::<Quote, F>(callback)));

        if let Err(e) = session.sink.send(WsMessage::Text(frame.into())).await {
            self.shared.registry.replace(channel, previous);
            return Err(ZbError::WebSocketMsg(format!(
                "Failed to send subscription: {}",
                e
            )));
        }

        tracing::debug!(channel = %channel, "Subscribed");
        Ok(())
    }

    /// Check if the connection is open.
    pub async fn is_connected(&self) -> bool {
        matches!(
            *self.shared.state.lock().await,
            ConnectionState::Running(_)
        )
    }

    /// Names of the subscribed channels, sorted.
    pub fn subscribed_channels(&self) -> Vec<String> {
        self.shared.registry.channels()
    }
}

impl Default for ZbWsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ZbWsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZbWsClient")
            .field("url", &self.url)
            .field("channels", &self.shared.registry.channels())
            .finish()
    }
}

/// Receive frames and dispatch them until shutdown or a read failure.
async fn read_loop(
    mut receiver: WsReceiver,
    mut shutdown: oneshot::Receiver<()>,
    shared: Arc<Shared>,
    session: u64,
) {
    loop {
        tokio::select! {
            _ = &mut shutdown => return,
            frame = receiver.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => {
                    shared.registry.dispatch(text.as_str());
                }
                Some(Ok(WsMessage::Binary(data))) => match std::str::from_utf8(&data) {
                    Ok(text) => {
                        shared.registry.dispatch(text);
                    }
                    Err(_) => tracing::trace!(session, "Dropping non-UTF-8 binary frame"),
                },
                Some(Ok(WsMessage::Close(frame))) => {
                    tracing::info!(session, ?frame, "Server closed the connection");
                    break;
                }
                // Ping/pong replies are handled by tungstenite.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(session, "WebSocket error: {}", e);
                    break;
                }
                None => {
                    tracing::info!(session, "WebSocket stream ended");
                    break;
                }
            }
        }
    }

    // The handle to this task is inside the session, so dropping it only detaches.
    if shared.take_session(Some(session)).await.is_some() {
        tracing::info!(session, "WebSocket disconnected");
    }
}
