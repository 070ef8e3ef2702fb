//! Notification channel.
//!
//! Receives revision notifications from the server over one WebSocket
//! connection and queues them for a single consumer.
//!
//! # Reader Loop
//!
//! [`NotificationChannel::connect`] spawns a tokio task that handles:
//!
//! - Text frames, forwarded whole as one [`Notification`] each
//! - Close frames and end of stream, which end the queue
//! - WebSocket errors, delivered once and then ending the queue
//! - Close requests from [`NotificationChannel::close`]
//!
//! Nothing is ever sent to the server apart from the closing handshake.

// ============================================================================
// Imports
// ============================================================================

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, trace};
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Fixed path of the live-update endpoint on the page's host.
pub const LIVE_UPDATE_PATH: &str = "/websocket";

// ============================================================================
// Types
// ============================================================================

/// Stream type returned by the client handshake.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Queue item: a notification, or the error that ended the connection.
type ChannelItem = Result<Notification>;

// ============================================================================
// Endpoint
// ============================================================================

/// Derives the live-update endpoint from a page address.
///
/// Keeps host and port, picks `wss` for `https` pages and `ws` otherwise,
/// and replaces path, query and fragment with [`LIVE_UPDATE_PATH`].
///
/// # Errors
///
/// Returns [`Error::Config`] if the page address has no host.
pub fn endpoint_for(page: &Url) -> Result<Url> {
    let host = page
        .host_str()
        .ok_or_else(|| Error::config(format!("Page address has no host: {page}")))?;

    let scheme = if page.scheme() == "https" { "wss" } else { "ws" };
    let authority = match page.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let endpoint = Url::parse(&format!("{scheme}://{authority}{LIVE_UPDATE_PATH}"))?;
    Ok(endpoint)
}

// ============================================================================
// Notification
// ============================================================================

/// One server notification: the entire text of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    payload: String,
}

impl Notification {
    /// Creates a notification from a raw payload.
    #[inline]
    #[must_use]
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Returns the raw payload.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

// ============================================================================
// ChannelCommand
// ============================================================================

/// Internal commands for the reader loop.
#[derive(Debug)]
enum ChannelCommand {
    /// Send a close frame and stop reading.
    Close,
}

// ============================================================================
// NotificationSender
// ============================================================================

/// Producer side of a manually fed channel.
///
/// Lets an embedder bridge notifications from a transport of its own.
#[derive(Debug, Clone)]
pub struct NotificationSender {
    message_tx: mpsc::UnboundedSender<ChannelItem>,
}

impl NotificationSender {
    /// Delivers one notification payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the channel was dropped or closed.
    pub fn send(&self, payload: impl Into<String>) -> Result<()> {
        self.message_tx
            .send(Ok(Notification::new(payload)))
            .map_err(|_| Error::ConnectionClosed)
    }

    /// Delivers a transport failure to the consumer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the channel was dropped or closed.
    pub fn fail(&self, error: Error) -> Result<()> {
        self.message_tx
            .send(Err(error))
            .map_err(|_| Error::ConnectionClosed)
    }
}

// ============================================================================
// NotificationChannel
// ============================================================================

/// Single-consumer queue of server notifications.
///
/// Owned by the live-update client for its whole lifetime. It is never
/// reconnected; once [`recv`](Self::recv) yields `None` the channel is done.
#[derive(Debug)]
pub struct NotificationChannel {
    /// Notifications in arrival order.
    message_rx: mpsc::UnboundedReceiver<ChannelItem>,
    /// Commands for the reader loop (absent for manual channels).
    command_tx: Option<mpsc::UnboundedSender<ChannelCommand>>,
}

impl NotificationChannel {
    /// Connects to a live-update endpoint.
    ///
    /// Spawns the reader loop internally.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the WebSocket handshake fails.
    pub async fn connect(endpoint: &Url) -> Result<Self> {
        let (ws_stream, response) = tokio_tungstenite::connect_async(endpoint.as_str())
            .await
            .map_err(|e| Error::connection(format!("WebSocket handshake with {endpoint} failed: {e}")))?;

        info!(%endpoint, status = %response.status(), "Notification channel established");

        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        tokio::spawn(Self::run_reader(ws_stream, message_tx, command_rx));

        Ok(Self {
            message_rx,
            command_tx: Some(command_tx),
        })
    }

    /// Creates a channel fed by hand instead of a socket.
    #[must_use]
    pub fn manual() -> (NotificationSender, Self) {
        let (message_tx, message_rx) = mpsc::unbounded_channel();

        let sender = NotificationSender { message_tx };
        let channel = Self {
            message_rx,
            command_tx: None,
        };

        (sender, channel)
    }

    /// Receives the next notification in arrival order.
    ///
    /// Returns `None` once the connection has ended. A transport failure is
    /// yielded once as `Some(Err(..))` before that.
    pub async fn recv(&mut self) -> Option<Result<Notification>> {
        self.message_rx.recv().await
    }

    /// Closes the channel.
    ///
    /// Socket channels send a close frame. Notifications already queued can
    /// still be received.
    pub fn close(&mut self) {
        match self.command_tx.take() {
            Some(command_tx) => {
                let _ = command_tx.send(ChannelCommand::Close);
            }
            None => self.message_rx.close(),
        }
    }

    /// Reader loop that handles WebSocket I/O.
    async fn run_reader(
        ws_stream: WsStream,
        message_tx: mpsc::UnboundedSender<ChannelItem>,
        mut command_rx: mpsc::UnboundedReceiver<ChannelCommand>,
    ) {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            trace!(len = text.len(), "Notification frame received");

                            if message_tx.send(Ok(Notification::new(text.as_str()))).is_err() {
                                debug!("Notification consumer dropped");
                                let _ = ws_write.close().await;
                                break;
                            }
                        }

                        Some(Ok(Message::Close(frame))) => {
                            debug!(?frame, "WebSocket closed by server");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            let _ = message_tx.send(Err(Error::WebSocket(e)));
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Binary, Ping, Pong, raw frames
                        Some(Ok(_)) => {
                            trace!("Ignoring non-text frame");
                        }
                    }
                }

                command = command_rx.recv() => {
                    match command {
                        Some(ChannelCommand::Close) => {
                            debug!("Close requested");
                        }
                        None => {
                            debug!("Channel handle dropped");
                        }
                    }
                    let _ = ws_write.close().await;
                    break;
                }
            }
        }

        debug!("Notification reader terminated");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::net::TcpListener;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("valid url")
    }

    #[test]
    fn test_endpoint_plain_http() {
        let endpoint = endpoint_for(&url("http://localhost:8080/posts/hello.html")).expect("endpoint");
        assert_eq!(endpoint.as_str(), "ws://localhost:8080/websocket");
    }

    #[test]
    fn test_endpoint_secure_page_uses_wss() {
        let endpoint = endpoint_for(&url("https://docs.example.com/a/b?x=1#top")).expect("endpoint");
        assert_eq!(endpoint.as_str(), "wss://docs.example.com/websocket");
    }

    #[test]
    fn test_endpoint_ipv6_host() {
        let endpoint = endpoint_for(&url("http://[::1]:4000/")).expect("endpoint");
        assert_eq!(endpoint.as_str(), "ws://[::1]:4000/websocket");
    }

    #[test]
    fn test_endpoint_requires_host() {
        let err = endpoint_for(&url("file:///tmp/index.html")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[tokio::test]
    async fn test_manual_channel_preserves_order() {
        let (sender, mut channel) = NotificationChannel::manual();
        sender.send("1").expect("send");
        sender.send("2").expect("send");
        drop(sender);

        let first = channel.recv().await.expect("item").expect("ok");
        let second = channel.recv().await.expect("item").expect("ok");
        assert_eq!(first.payload(), "1");
        assert_eq!(second.payload(), "2");
        assert!(channel.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_manual_channel_close_rejects_sends() {
        let (sender, mut channel) = NotificationChannel::manual();
        channel.close();

        assert!(matches!(sender.send("1"), Err(Error::ConnectionClosed)));
        assert!(channel.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_manual_channel_delivers_failure() {
        let (sender, mut channel) = NotificationChannel::manual();
        sender.fail(Error::connection("dropped")).expect("fail");

        let item = channel.recv().await.expect("item");
        assert!(matches!(item, Err(Error::Connection { .. })));
    }

    #[tokio::test]
    async fn test_connect_refused() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);

        let endpoint = url(&format!("ws://127.0.0.1:{port}/websocket"));
        let err = NotificationChannel::connect(&endpoint).await.unwrap_err();
        assert!(err.is_connection_error());
    }

    #[tokio::test]
    async fn test_socket_channel_forwards_text_frames() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = tokio_tungstenite::accept_async(stream).await.expect("upgrade");
            ws.send(Message::Text("4".into())).await.expect("send");
            ws.send(Message::Binary(vec![1, 2, 3].into())).await.expect("send");
            ws.send(Message::Text("5".into())).await.expect("send");
            ws.close(None).await.expect("close");
        });

        let endpoint = url(&format!("ws://127.0.0.1:{port}/websocket"));
        let mut channel = NotificationChannel::connect(&endpoint).await.expect("connect");

        let first = channel.recv().await.expect("item").expect("ok");
        let second = channel.recv().await.expect("item").expect("ok");
        assert_eq!(first.payload(), "4");
        assert_eq!(second.payload(), "5");
        assert!(channel.recv().await.is_none());

        server.await.expect("server task");
    }
}
