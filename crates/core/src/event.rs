//! Inbound room events
//!
//! The server emits four event kinds. Each arrives as a name plus a JSON
//! payload; [`RoomEvent::decode`] turns that pair into the closed
//! [`RoomEvent`] union and rejects names this client does not know.
//!
//! Payload fields are all optional at the serde level so that a missing
//! field surfaces as a [`EventError::Validation`] carrying the event kind,
//! not as an anonymous decode failure. The `validate` methods produce the
//! domain types the store accepts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EventError;
use crate::models::{LocalSession, MessageDraft, MessageKind, Participant, ParticipantId, RoomCode};

/// The recognized event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    RoomSnapshot,
    ParticipantJoined,
    ParticipantLeft,
    ChatMessage,
}

impl EventKind {
    /// Event name used on the wire
    pub fn wire_name(&self) -> &'static str {
        match self {
            EventKind::RoomSnapshot => "room-joined",
            EventKind::ParticipantJoined => "user-joined",
            EventKind::ParticipantLeft => "user-left",
            EventKind::ChatMessage => "new-message",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "room-joined" => Some(EventKind::RoomSnapshot),
            "user-joined" => Some(EventKind::ParticipantJoined),
            "user-left" => Some(EventKind::ParticipantLeft),
            "new-message" => Some(EventKind::ChatMessage),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// `{ id, name }` as sent by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl ParticipantPayload {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
        }
    }

    pub fn validate(&self, kind: EventKind) -> Result<Participant, EventError> {
        let id = self
            .id
            .as_deref()
            .ok_or_else(|| EventError::validation(kind, "missing participant id"))?;
        let name = self
            .name
            .as_deref()
            .ok_or_else(|| EventError::validation(kind, "missing participant name"))?;
        Participant::parse(id, name).map_err(|e| EventError::validation(kind, e.to_string()))
    }
}

/// Host reference: the server may send a bare id or a full participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParticipantRef {
    Id(String),
    Participant(ParticipantPayload),
}

impl ParticipantRef {
    /// Resolve to a validated host reference.
    ///
    /// An object with a usable id but a missing or blank name degrades to a
    /// bare id, which the store resolves against the participant list.
    pub fn resolve(&self, kind: EventKind) -> Result<HostRef, EventError> {
        let bad_id = |e: crate::Error| EventError::validation(kind, e.to_string());
        match self {
            ParticipantRef::Id(id) => ParticipantId::parse(id).map(HostRef::Id).map_err(bad_id),
            ParticipantRef::Participant(p) => match p.validate(kind) {
                Ok(p) => Ok(HostRef::Participant(p)),
                Err(e) => match p.id.as_deref() {
                    Some(id) => ParticipantId::parse(id).map(HostRef::Id).map_err(bad_id),
                    None => Err(e),
                },
            },
        }
    }
}

/// Chat message as sent by the server, live or inside a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl MessagePayload {
    pub fn chat(sender: &str, message: &str) -> Self {
        Self {
            sender: Some(sender.to_string()),
            message: Some(message.to_string()),
            kind: None,
        }
    }

    /// `kind` is the event the message arrived in: a live `new-message` or
    /// a snapshot's history.
    pub fn validate(&self, kind: EventKind) -> Result<MessageDraft, EventError> {
        let sender = self
            .sender
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| EventError::validation(kind, "missing sender"))?;
        let body = self
            .message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| EventError::validation(kind, "empty message body"))?;
        let message_kind = MessageKind::from_tag(self.kind.as_deref()).ok_or_else(|| {
            EventError::validation(
                kind,
                format!("unknown message type {:?}", self.kind.as_deref().unwrap_or_default()),
            )
        })?;

        Ok(MessageDraft {
            sender: sender.to_string(),
            body: body.to_string(),
            kind: message_kind,
        })
    }
}

/// `room` object inside a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPayload {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub host: Option<ParticipantRef>,
    #[serde(default)]
    pub participants: Vec<ParticipantPayload>,
    #[serde(default)]
    pub messages: Vec<MessagePayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotPayload {
    #[serde(default)]
    pub room: Option<RoomPayload>,
    #[serde(default)]
    pub user: Option<ParticipantPayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedPayload {
    #[serde(default)]
    pub user: Option<ParticipantPayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeftPayload {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
}

/// A snapshot after validation, ready for the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub code: RoomCode,
    pub host: Option<HostRef>,
    pub participants: Vec<Participant>,
    pub messages: Vec<MessageDraft>,
}

/// Validated host reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRef {
    Id(ParticipantId),
    Participant(Participant),
}

impl SnapshotPayload {
    /// Validate the snapshot and the local user.
    ///
    /// Only the room code and the local user are hard requirements. Entries
    /// of the participant list or history that fail validation are skipped.
    pub fn validate(&self) -> Result<(Snapshot, LocalSession), EventError> {
        let kind = EventKind::RoomSnapshot;
        let room = self
            .room
            .as_ref()
            .ok_or_else(|| EventError::validation(kind, "missing room"))?;
        let code = room
            .code
            .as_deref()
            .ok_or_else(|| EventError::validation(kind, "missing room code"))?;
        let code = RoomCode::parse(code).map_err(|e| EventError::validation(kind, e.to_string()))?;
        let user = self
            .user
            .as_ref()
            .ok_or_else(|| EventError::validation(kind, "missing local user"))?
            .validate(kind)?;

        let host = room.host.as_ref().and_then(|host| match host.resolve(kind) {
            Ok(host) => Some(host),
            Err(e) => {
                tracing::warn!(room = %code, error = %e, "Ignoring malformed host reference");
                None
            }
        });

        let participants = room
            .participants
            .iter()
            .filter_map(|p| match p.validate(kind) {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::warn!(room = %code, error = %e, "Skipping malformed snapshot participant");
                    None
                }
            })
            .collect();

        let messages = room
            .messages
            .iter()
            .filter_map(|m| match m.validate(kind) {
                Ok(m) => Some(m),
                Err(e) => {
                    tracing::warn!(room = %code, error = %e, "Skipping malformed snapshot message");
                    None
                }
            })
            .collect();

        let session = LocalSession::new(user, code.clone());
        Ok((
            Snapshot {
                code,
                host,
                participants,
                messages,
            },
            session,
        ))
    }
}

impl JoinedPayload {
    pub fn validate(&self) -> Result<Participant, EventError> {
        let kind = EventKind::ParticipantJoined;
        self.user
            .as_ref()
            .ok_or_else(|| EventError::validation(kind, "missing user"))?
            .validate(kind)
    }
}

impl LeftPayload {
    /// Only the id is required; the name is informational.
    pub fn validate(&self) -> Result<ParticipantId, EventError> {
        let kind = EventKind::ParticipantLeft;
        let id = self
            .user_id
            .as_deref()
            .ok_or_else(|| EventError::validation(kind, "missing userId"))?;
        ParticipantId::parse(id).map_err(|e| EventError::validation(kind, e.to_string()))
    }
}

/// Server-originated room event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    RoomSnapshot(SnapshotPayload),
    ParticipantJoined(JoinedPayload),
    ParticipantLeft(LeftPayload),
    ChatMessage(MessagePayload),
}

impl RoomEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            RoomEvent::RoomSnapshot(_) => EventKind::RoomSnapshot,
            RoomEvent::ParticipantJoined(_) => EventKind::ParticipantJoined,
            RoomEvent::ParticipantLeft(_) => EventKind::ParticipantLeft,
            RoomEvent::ChatMessage(_) => EventKind::ChatMessage,
        }
    }

    /// Decode a named event and its JSON payload
    pub fn decode(name: &str, data: Value) -> Result<Self, EventError> {
        let kind =
            EventKind::from_wire(name).ok_or_else(|| EventError::UnknownKind(name.to_string()))?;
        let malformed = |e: serde_json::Error| EventError::validation(kind, e.to_string());

        let event = match kind {
            EventKind::RoomSnapshot => {
                RoomEvent::RoomSnapshot(serde_json::from_value(data).map_err(malformed)?)
            }
            EventKind::ParticipantJoined => {
                RoomEvent::ParticipantJoined(serde_json::from_value(data).map_err(malformed)?)
            }
            EventKind::ParticipantLeft => {
                RoomEvent::ParticipantLeft(serde_json::from_value(data).map_err(malformed)?)
            }
            EventKind::ChatMessage => {
                RoomEvent::ChatMessage(serde_json::from_value(data).map_err(malformed)?)
            }
        };
        Ok(event)
    }

    /// Payload as JSON, keyed by [`EventKind::wire_name`]
    pub fn payload(&self) -> Result<Value, serde_json::Error> {
        match self {
            RoomEvent::RoomSnapshot(p) => serde_json::to_value(p),
            RoomEvent::ParticipantJoined(p) => serde_json::to_value(p),
            RoomEvent::ParticipantLeft(p) => serde_json::to_value(p),
            RoomEvent::ChatMessage(p) => serde_json::to_value(p),
        }
    }

    pub fn snapshot(
        code: &str,
        host: Option<ParticipantRef>,
        participants: &[(&str, &str)],
        user: (&str, &str),
    ) -> Self {
        RoomEvent::RoomSnapshot(SnapshotPayload {
            room: Some(RoomPayload {
                code: Some(code.to_string()),
                host,
                participants: participants
                    .iter()
                    .map(|(id, name)| ParticipantPayload::new(id, name))
                    .collect(),
                messages: Vec::new(),
            }),
            user: Some(ParticipantPayload::new(user.0, user.1)),
        })
    }

    pub fn joined(id: &str, name: &str) -> Self {
        RoomEvent::ParticipantJoined(JoinedPayload {
            user: Some(ParticipantPayload::new(id, name)),
        })
    }

    pub fn left(id: &str, name: &str) -> Self {
        RoomEvent::ParticipantLeft(LeftPayload {
            user_id: Some(id.to_string()),
            user_name: Some(name.to_string()),
        })
    }

    pub fn chat(sender: &str, message: &str) -> Self {
        RoomEvent::ChatMessage(MessagePayload::chat(sender, message))
    }
}
