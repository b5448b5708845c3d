//! Socket connector on top of `tokio-tungstenite`.
//!
//! The stream is split into a writer task fed by the outbound channel and a
//! reader task that forwards text frames to the inbound channel. Dropping the
//! outbound sender sends a close frame; the inbound channel ends when the
//! peer closes or the transport fails.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    domain::{Connector, SocketHandle},
    error::ConnectionError,
};

/// `Connector` for `ws://` endpoints
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

impl WebSocketConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for WebSocketConnector {
    async fn connect(&self, url: &str) -> Result<SocketHandle, ConnectionError> {
        let (ws_stream, response) = connect_async(url)
            .await
            .map_err(|e| ConnectionError::ConnectFailed(e.to_string()))?;
        tracing::debug!("WebSocket handshake completed ({})", response.status());

        let (mut write, mut read) = ws_stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<String>();

        // Writer: outbound channel -> socket
        tokio::spawn(async move {
            while let Some(text) = outbound_rx.recv().await {
                if let Err(e) = write.send(Message::Text(text.into())).await {
                    tracing::debug!("WebSocket write error: {}", e);
                    return;
                }
            }
            // Outbound sender dropped: close deliberately.
            let _ = write.send(Message::Close(None)).await;
            let _ = write.close().await;
        });

        // Reader: socket -> inbound channel
        tokio::spawn(async move {
            while let Some(message) = read.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        if inbound_tx.send(text.as_str().to_owned()).is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(frame)) => {
                        tracing::debug!("Server closed the connection: {:?}", frame);
                        break;
                    }
                    Ok(Message::Binary(data)) => {
                        tracing::debug!("Ignoring {} bytes of binary data", data.len());
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("WebSocket read error: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(SocketHandle {
            outbound: outbound_tx,
            inbound: inbound_rx,
        })
    }
}
