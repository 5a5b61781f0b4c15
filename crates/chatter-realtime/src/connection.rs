//! Per-connection handler: attach, then pump frames both ways until close.

use std::net::SocketAddr;

use chatter_common::{ChatterError, ConnectionId};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::dispatch::{ConnectionEvent, Realtime};
use crate::protocol::{parse_frame, ServerEvent};

/// Limits applied to every connection.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionLimits {
    pub outbound_buffer: usize,
    pub max_message_bytes: usize,
}

impl From<&chatter_config::RealtimeConfig> for ConnectionLimits {
    fn from(config: &chatter_config::RealtimeConfig) -> Self {
        Self {
            outbound_buffer: config.outbound_buffer as usize,
            max_message_bytes: config.max_message_bytes as usize,
        }
    }
}

/// Handle a single WebSocket connection.
pub async fn handle_connection(
    ws: WebSocketStream<TcpStream>,
    addr: SocketAddr,
    realtime: Realtime,
    limits: ConnectionLimits,
) {
    let (mut sink, mut stream) = ws.split();
    let connection = ConnectionId::new();

    let (tx, mut rx) = mpsc::channel::<String>(limits.outbound_buffer);
    realtime
        .dispatch(ConnectionEvent::Connected {
            connection: connection.clone(),
            outbound: tx,
        })
        .await;

    tracing::info!(peer = %addr, connection = %connection, "Client connected");

    loop {
        tokio::select! {
            // Frames queued for this client -> its WebSocket
            Some(frame) = rx.recv() => {
                if sink.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }

            // Frames from this client's WebSocket -> dispatch
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match parse_frame(&text, limits.max_message_bytes) {
                            Ok(event) => {
                                realtime
                                    .dispatch(ConnectionEvent::from_client(connection.clone(), event))
                                    .await;
                            }
                            Err(e) => {
                                tracing::warn!(connection = %connection, error = %e, "Rejected client frame");
                                reply_error(&realtime, &connection, e).await;
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sink.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    tracing::info!(peer = %addr, connection = %connection, "Client disconnected");

    realtime
        .dispatch(ConnectionEvent::Disconnected { connection })
        .await;
}

/// Queue an `error` event for this connection only. Dropped frames are
/// logged by the hub.
async fn reply_error(realtime: &Realtime, connection: &ConnectionId, error: ChatterError) {
    let frame = ServerEvent::Error {
        message: error.to_string(),
    }
    .to_frame();
    realtime.hub().send_to(connection, frame).await;
}
