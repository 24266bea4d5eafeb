//! Network protocol message types
//!
//! Every frame carries an [`Envelope`]: an event name plus a JSON payload.
//! All messages are JSON-serialized and length-prefixed on the wire.

use huddle_core::{display_name, RoomCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Outbound: join a room by code
pub const JOIN_ROOM: &str = "join-room";
/// Outbound: post a chat message to the joined room
pub const SEND_MESSAGE: &str = "send-message";
/// Outbound: leave the joined room
pub const LEAVE_ROOM: &str = "leave-room";
/// Inbound: the server refused a join (e.g. unknown room code)
pub const JOIN_ERROR: &str = "join-error";

/// A named event and its payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// `join-room { roomCode, userName }` with a normalized code and trimmed name
    pub fn join_room(code: &RoomCode, user_name: &str) -> huddle_core::Result<Self> {
        let user_name = display_name(user_name)?;
        Ok(Self::new(
            JOIN_ROOM,
            json!({ "roomCode": code.as_str(), "userName": user_name }),
        ))
    }

    /// `send-message { message }`. Returns `None` for blank text.
    pub fn send_message(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self::new(SEND_MESSAGE, json!({ "message": text })))
    }

    pub fn leave_room() -> Self {
        Self::new(LEAVE_ROOM, json!({}))
    }

    /// Reason carried by a `join-error` envelope
    pub fn join_error_reason(&self) -> Option<String> {
        if self.event != JOIN_ERROR {
            return None;
        }
        let reason = self
            .data
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("Join rejected");
        Some(reason.to_string())
    }

    /// Serialize envelope to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize envelope from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

impl From<&huddle_core::RoomEvent> for Envelope {
    fn from(event: &huddle_core::RoomEvent) -> Self {
        let data = event.payload().unwrap_or(Value::Null);
        Self::new(event.kind().wire_name(), data)
    }
}
