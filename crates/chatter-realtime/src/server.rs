//! TCP accept loop and WebSocket handshake.

use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;

use crate::connection::{handle_connection, ConnectionLimits};
use crate::dispatch::Realtime;

/// Accept connections forever, one task per client. Accept and handshake
/// failures are logged and never stop the loop.
pub async fn serve(listener: TcpListener, realtime: Realtime, limits: ConnectionLimits) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let realtime = realtime.clone();
                tokio::spawn(async move {
                    match accept_async(stream).await {
                        Ok(ws) => handle_connection(ws, addr, realtime, limits).await,
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}
