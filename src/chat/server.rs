use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use futures::{StreamExt, SinkExt};
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};

use crate::chat::{BroadcastRelay, ConnectionRegistry};
use crate::error::{AppError, ChatError};

/// Path clients must request during the WebSocket handshake.
pub const CHAT_ENDPOINT: &str = "/message";

pub struct ChatServer {
    registry: Arc<ConnectionRegistry>,
    relay: Arc<BroadcastRelay>,
}

impl ChatServer {
    pub fn new() -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let relay = Arc::new(BroadcastRelay::new(registry.clone()));
        Self { registry, relay }
    }

    /// Accept loop: one spawned task per inbound connection.
    pub async fn run(self: Arc<Self>, listener: TcpListener) {
        while let Ok((stream, addr)) = listener.accept().await {
            let server = self.clone();
            tokio::spawn(async move {
                server.handle_connection(stream, addr).await;
            });
        }
    }

    pub async fn handle_connection(
        self: Arc<Self>,
        raw_stream: TcpStream,
        addr: std::net::SocketAddr,
    ) {
        info!("New WebSocket connection from: {}", addr);

        let ws_stream = match tokio_tungstenite::accept_hdr_async(raw_stream, check_endpoint).await
        {
            Ok(ws) => ws,
            Err(e) => {
                error!("{}", ChatError::HandshakeFailed(format!("{}: {}", addr, e)));
                return;
            }
        };

        let (ws_sink, ws_stream) = ws_stream.split();
        let (tx, rx) = mpsc::unbounded_channel();

        let connection_id = match self.registry.connect(tx.clone()).await {
            Ok(id) => id,
            Err(e) => {
                error!("Failed to register connection from {}: {}", addr, e);
                return;
            }
        };

        let relay = self.relay.clone();

        // Forward queued frames to the WebSocket
        let send_task = tokio::spawn(async move {
            let mut ws_sink = ws_sink;
            let mut rx = rx;

            while let Some(message) = rx.recv().await {
                if let Err(e) = ws_sink.send(message).await {
                    error!("Error sending WebSocket message: {}", e);
                    break;
                }
            }

            if let Err(e) = ws_sink.close().await {
                error!("Error closing WebSocket connection: {}", e);
            }
        });

        // Drive inbound messages into the relay until the peer goes away
        let receive_task = tokio::spawn(async move {
            let mut ws_stream = ws_stream;

            while let Some(message) = ws_stream.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        match relay.broadcast(connection_id, &text).await {
                            Ok(()) => {}
                            Err(AppError::ChatError(ChatError::MalformedPayload(_))) => {
                                // Drop-and-log; the connection stays up
                                warn!("Ignoring malformed message on {}", connection_id);
                            }
                            Err(e) => {
                                error!("Broadcast failed on {}: {}", connection_id, e);
                            }
                        }
                    }
                    Ok(Message::Ping(data)) => {
                        if tx.send(Message::Pong(data)).is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(reason)) => {
                        info!("Client closed connection {}: {:?}", connection_id, reason);
                        break;
                    }
                    Ok(_) => {
                        warn!("Unsupported message type on connection {}", connection_id);
                    }
                    Err(e) => {
                        error!("Error receiving WebSocket message: {}", e);
                        break;
                    }
                }
            }
        });

        // Wait for either task to complete
        tokio::select! {
            _ = send_task => {
                info!("Send task completed for connection {}", connection_id);
            }
            _ = receive_task => {
                info!("Receive task completed for connection {}", connection_id);
            }
        }

        // Cleanup: the driver loop owns exactly one disconnect per connection
        if let Err(e) = self.registry.disconnect(connection_id).await {
            error!("Disconnect failed for {}: {}", connection_id, e);
        }
        info!("Connection {} closed", connection_id);
    }

    pub fn registry(&self) -> Arc<ConnectionRegistry> {
        self.registry.clone()
    }

    pub fn relay(&self) -> Arc<BroadcastRelay> {
        self.relay.clone()
    }
}

impl Default for ChatServer {
    fn default() -> Self {
        Self::new()
    }
}

fn check_endpoint(req: &Request, response: Response) -> Result<Response, ErrorResponse> {
    if req.uri().path() == CHAT_ENDPOINT {
        Ok(response)
    } else {
        let mut not_found = ErrorResponse::new(Some("unknown websocket endpoint".to_string()));
        *not_found.status_mut() = StatusCode::NOT_FOUND;
        Err(not_found)
    }
}
