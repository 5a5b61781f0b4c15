//! chatter-realtime: WebSocket presence and messaging hub.
//!
//! Clients announce which user they are, receive the online-user list
//! whenever it changes, and exchange targeted message, edit and delete
//! notifications. Presence is held in memory per process; the durable
//! message store lives elsewhere and clients that miss a realtime event
//! catch up from it.

pub mod connection;
pub mod dispatch;
pub mod hub;
pub mod protocol;
pub mod server;

pub use connection::ConnectionLimits;
pub use dispatch::{ConnectionEvent, DispatchOutcome, Realtime};
pub use hub::ConnectionHub;
pub use protocol::{ClientEvent, ServerEvent};
pub use server::serve;
