//! Realtime wire protocol. Every frame is a JSON text message of the form
//! `{"event": "<name>", "data": <payload>}`.

use chatter_common::{ChatterError, UserId};
use chatter_presence::PresenceEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Events a client sends to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Announce which user this connection belongs to.
    #[serde(rename = "sendUser")]
    SendUser(UserId),

    #[serde(rename = "sendMessage")]
    SendMessage(OutgoingMessage),

    #[serde(rename = "deleteMessage")]
    DeleteMessage(MessageNotice),

    #[serde(rename = "editMessage")]
    EditMessage(MessageNotice),
}

/// Parse one inbound text frame, rejecting frames over `max_bytes`.
pub fn parse_frame(text: &str, max_bytes: usize) -> chatter_common::Result<ClientEvent> {
    if text.len() > max_bytes {
        return Err(ChatterError::Protocol(format!(
            "frame of {} bytes exceeds limit of {max_bytes}",
            text.len()
        )));
    }
    Ok(serde_json::from_str(text)?)
}

/// Events the server sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Everyone currently online.
    #[serde(rename = "getUsers")]
    GetUsers(Vec<PresenceEntry>),

    #[serde(rename = "getMessage")]
    GetMessage(DeliveredMessage),

    #[serde(rename = "deleteMessageClient")]
    DeleteMessageClient(MessageNotice),

    #[serde(rename = "editMessageClient")]
    EditMessageClient(MessageNotice),

    #[serde(rename = "error")]
    Error { message: String },
}

impl ServerEvent {
    pub fn to_frame(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"event":"error","data":{{"message":"failed to encode event: {e}"}}}}"#)
        })
    }
}

/// A chat message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub text: String,
    pub conversation_id: String,
    /// Recipient profile as the sending client knows it; passed through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Value>,
}

/// What the recipient of an [`OutgoingMessage`] receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveredMessage {
    pub sender_id: UserId,
    pub text: String,
    pub conversation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Value>,
}

impl From<OutgoingMessage> for DeliveredMessage {
    fn from(msg: OutgoingMessage) -> Self {
        Self {
            sender_id: msg.sender_id,
            text: msg.text,
            conversation_id: msg.conversation_id,
            receiver: msg.receiver,
        }
    }
}

/// Edit/delete notification. Only `receiverId` is interpreted; every other
/// field is forwarded to the recipient untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageNotice {
    pub receiver_id: UserId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}
