//! Dual-map presence registry.

use std::collections::HashMap;
use std::sync::Arc;

use chatter_common::{ConnectionId, UserId};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// One user currently reachable through one connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEntry {
    pub user_id: UserId,
    pub connection_id: ConnectionId,
    pub online_at: DateTime<Utc>,
}

/// What `register` did to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The user had no entry.
    New,
    /// The user was already registered on this exact connection.
    Unchanged,
    /// The user's previous connection was replaced.
    Superseded { previous: ConnectionId },
}

/// `by_user` keeps first-registration order; a reconnect keeps its slot.
#[derive(Default)]
struct Entries {
    by_user: IndexMap<UserId, PresenceEntry>,
    by_connection: HashMap<ConnectionId, UserId>,
}

impl Entries {
    /// Drop the forward entry for `user` if it still points at `connection`.
    fn remove_user_on(&mut self, user: &UserId, connection: &ConnectionId) {
        if self
            .by_user
            .get(user)
            .is_some_and(|entry| &entry.connection_id == connection)
        {
            self.by_user.shift_remove(user);
        }
    }
}

/// Shared presence registry. Cloning yields another handle to the same state.
///
/// Both maps live behind one lock, so every `register` and `unregister` is
/// observed atomically by `lookup` and `snapshot`.
#[derive(Clone, Default)]
pub struct PresenceRegistry {
    entries: Arc<RwLock<Entries>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `user` is now reachable via `connection`.
    pub async fn register(&self, user: UserId, connection: ConnectionId) -> Registration {
        let mut guard = self.entries.write().await;
        let entries = &mut *guard;

        // A connection represents at most one user: announcing a different
        // user on the same connection drops the earlier one.
        if let Some(prior_user) = entries.by_connection.get(&connection).cloned() {
            if prior_user != user {
                entries.remove_user_on(&prior_user, &connection);
                tracing::debug!(
                    connection = %connection,
                    previous_user = %prior_user,
                    user = %user,
                    "Connection re-announced as a different user"
                );
            }
        }

        let outcome = match entries.by_user.get(&user) {
            Some(entry) if entry.connection_id == connection => return Registration::Unchanged,
            Some(entry) => {
                let previous = entry.connection_id.clone();
                entries.by_connection.remove(&previous);
                Registration::Superseded { previous }
            }
            None => Registration::New,
        };

        entries.by_connection.insert(connection.clone(), user.clone());
        entries.by_user.insert(
            user.clone(),
            PresenceEntry {
                user_id: user,
                connection_id: connection,
                online_at: Utc::now(),
            },
        );

        outcome
    }

    /// Remove whatever user `connection` represents. Unknown connections are
    /// a no-op. Returns the user that went offline, if any.
    pub async fn unregister(&self, connection: &ConnectionId) -> Option<UserId> {
        let mut guard = self.entries.write().await;
        let entries = &mut *guard;
        let user = entries.by_connection.remove(connection)?;
        entries.remove_user_on(&user, connection);
        Some(user)
    }

    /// The connection currently representing `user`, if any.
    pub async fn lookup(&self, user: &UserId) -> Option<ConnectionId> {
        self.entries
            .read()
            .await
            .by_user
            .get(user)
            .map(|entry| entry.connection_id.clone())
    }

    /// Every current entry, in the order users first came online. Consumers
    /// must not attach meaning to the order.
    pub async fn snapshot(&self) -> Vec<PresenceEntry> {
        self.entries.read().await.by_user.values().cloned().collect()
    }

    /// Whether `user` currently has a registered connection.
    pub async fn is_online(&self, user: &UserId) -> bool {
        self.entries.read().await.by_user.contains_key(user)
    }

    /// Number of users currently online.
    pub async fn len(&self) -> usize {
        self.entries.read().await.by_user.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
