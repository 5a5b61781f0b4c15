//! Connection events and their effect on presence and delivery.
//!
//! Each connection task calls [`Realtime::dispatch`] independently; all
//! serialization of presence state happens inside the registry. Online-user
//! broadcasts are serialized separately so the last list a client receives
//! is never older than the registry.

use std::sync::Arc;

use chatter_common::{ConnectionId, UserId};
use chatter_presence::{PresenceRegistry, Registration};
use tokio::sync::{mpsc, Mutex};

use crate::hub::ConnectionHub;
use crate::protocol::{ClientEvent, ServerEvent};

/// Something that happened on one connection.
#[derive(Debug)]
pub enum ConnectionEvent {
    Connected {
        connection: ConnectionId,
        outbound: mpsc::Sender<String>,
    },
    Announce {
        connection: ConnectionId,
        user: UserId,
    },
    Deliver {
        from: ConnectionId,
        to: UserId,
        event: ServerEvent,
    },
    Disconnected {
        connection: ConnectionId,
    },
}

impl ConnectionEvent {
    /// Translate a parsed client frame into the event it triggers.
    pub fn from_client(connection: ConnectionId, event: ClientEvent) -> Self {
        match event {
            ClientEvent::SendUser(user) => ConnectionEvent::Announce { connection, user },
            ClientEvent::SendMessage(msg) => ConnectionEvent::Deliver {
                from: connection,
                to: msg.receiver_id.clone(),
                event: ServerEvent::GetMessage(msg.into()),
            },
            ClientEvent::DeleteMessage(notice) => ConnectionEvent::Deliver {
                from: connection,
                to: notice.receiver_id.clone(),
                event: ServerEvent::DeleteMessageClient(notice),
            },
            ClientEvent::EditMessage(notice) => ConnectionEvent::Deliver {
                from: connection,
                to: notice.receiver_id.clone(),
                event: ServerEvent::EditMessageClient(notice),
            },
        }
    }
}

/// What dispatching an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Attached,
    /// The online-user list was sent to this many connections.
    Broadcast(usize),
    Delivered,
    /// Recipient offline, recipient is the sender, or its queue refused.
    Skipped,
}

/// Presence registry plus connection hub, shared by every connection task.
#[derive(Clone, Default)]
pub struct Realtime {
    presence: PresenceRegistry,
    hub: ConnectionHub,
    /// Held across snapshot and broadcast so lists go out in registry order.
    broadcast_order: Arc<Mutex<()>>,
}

impl Realtime {
    pub fn new(presence: PresenceRegistry, hub: ConnectionHub) -> Self {
        Self {
            presence,
            hub,
            broadcast_order: Arc::default(),
        }
    }

    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    pub fn hub(&self) -> &ConnectionHub {
        &self.hub
    }

    pub async fn dispatch(&self, event: ConnectionEvent) -> DispatchOutcome {
        match event {
            ConnectionEvent::Connected {
                connection,
                outbound,
            } => {
                self.hub.attach(connection, outbound).await;
                DispatchOutcome::Attached
            }

            ConnectionEvent::Announce { connection, user } => {
                match self.presence.register(user.clone(), connection.clone()).await {
                    Registration::Superseded { previous } => tracing::info!(
                        user = %user,
                        connection = %connection,
                        previous = %previous,
                        "User reconnected"
                    ),
                    Registration::New => {
                        tracing::info!(user = %user, connection = %connection, "User online")
                    }
                    Registration::Unchanged => {}
                }
                DispatchOutcome::Broadcast(self.broadcast_users().await)
            }

            ConnectionEvent::Deliver { from, to, event } => {
                let Some(target) = self.presence.lookup(&to).await else {
                    tracing::debug!(user = %to, "Recipient offline, skipping delivery");
                    return DispatchOutcome::Skipped;
                };
                if target == from {
                    return DispatchOutcome::Skipped;
                }
                if self.hub.send_to(&target, event.to_frame()).await {
                    DispatchOutcome::Delivered
                } else {
                    DispatchOutcome::Skipped
                }
            }

            ConnectionEvent::Disconnected { connection } => {
                self.hub.detach(&connection).await;
                if let Some(user) = self.presence.unregister(&connection).await {
                    tracing::info!(user = %user, connection = %connection, "User offline");
                }
                DispatchOutcome::Broadcast(self.broadcast_users().await)
            }
        }
    }

    async fn broadcast_users(&self) -> usize {
        // `broadcast` never awaits a client queue.
        let _order = self.broadcast_order.lock().await;
        let users = self.presence.snapshot().await;
        let online = users.len();
        let sent = self.hub.broadcast(&ServerEvent::GetUsers(users).to_frame()).await;
        tracing::debug!(online, recipients = sent, "Broadcast online users");
        sent
    }
}
