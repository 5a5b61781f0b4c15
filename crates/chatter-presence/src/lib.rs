//! Presence registry: which realtime connection currently represents each
//! user.
//!
//! State is process-local and in-memory only. Two instances of the server
//! each see only the users connected to them.

mod registry;

pub use registry::{PresenceEntry, PresenceRegistry, Registration};
