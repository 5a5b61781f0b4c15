//! Connection hub: maps connection IDs to their outbound frame queues.

use std::collections::HashMap;
use std::sync::Arc;

use chatter_common::ConnectionId;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::RwLock;

/// Thread-safe map of live connections. Delivery is best-effort: a client
/// whose queue is full or closed misses the frame.
#[derive(Clone, Default)]
pub struct ConnectionHub {
    senders: Arc<RwLock<HashMap<ConnectionId, mpsc::Sender<String>>>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn attach(&self, connection: ConnectionId, tx: mpsc::Sender<String>) {
        self.senders.write().await.insert(connection, tx);
    }

    /// Returns false if the connection was not attached.
    pub async fn detach(&self, connection: &ConnectionId) -> bool {
        self.senders.write().await.remove(connection).is_some()
    }

    /// Queue a frame for one connection. Returns whether it was queued.
    pub async fn send_to(&self, connection: &ConnectionId, frame: String) -> bool {
        let tx = match self.senders.read().await.get(connection) {
            Some(tx) => tx.clone(),
            None => return false,
        };
        offer(connection, &tx, frame)
    }

    /// Queue a frame for every attached connection. Returns how many
    /// connections accepted it.
    pub async fn broadcast(&self, frame: &str) -> usize {
        let targets: Vec<(ConnectionId, mpsc::Sender<String>)> = self
            .senders
            .read()
            .await
            .iter()
            .map(|(id, tx)| (id.clone(), tx.clone()))
            .collect();

        targets
            .iter()
            .filter(|(id, tx)| offer(id, tx, frame.to_string()))
            .count()
    }

    pub async fn len(&self) -> usize {
        self.senders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn offer(connection: &ConnectionId, tx: &mpsc::Sender<String>, frame: String) -> bool {
    match tx.try_send(frame) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::debug!(connection = %connection, "Outbound queue full, dropping frame");
            false
        }
        Err(TrySendError::Closed(_)) => {
            tracing::debug!(connection = %connection, "Outbound queue closed");
            false
        }
    }
}
