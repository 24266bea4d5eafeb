//! Message model for room chat

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sender name used for join/leave announcements
pub const SYSTEM_SENDER: &str = "System";

/// Message type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Chat,
    System,
}

impl MessageKind {
    /// Parse the optional wire tag. A missing tag means `chat`.
    pub fn from_tag(tag: Option<&str>) -> Option<Self> {
        match tag {
            None | Some("chat") => Some(MessageKind::Chat),
            Some("system") => Some(MessageKind::System),
            Some(_) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Chat => "chat",
            MessageKind::System => "system",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated message waiting to be appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub sender: String,
    pub body: String,
    pub kind: MessageKind,
}

impl MessageDraft {
    pub fn chat(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            kind: MessageKind::Chat,
        }
    }

    pub fn system(body: impl Into<String>) -> Self {
        Self {
            sender: SYSTEM_SENDER.to_string(),
            body: body.into(),
            kind: MessageKind::System,
        }
    }

    pub fn joined(name: &str) -> Self {
        Self::system(format!("{} joined the room", name))
    }

    pub fn left(name: &str) -> Self {
        Self::system(format!("{} left the room", name))
    }
}

/// A message in the room log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Append index in the log
    pub position: usize,
    pub sender: String,
    pub body: String,
    pub kind: MessageKind,
    /// Local arrival time. Not used for ordering.
    pub received_at: DateTime<Utc>,
}

impl Message {
    pub fn from_draft(position: usize, draft: MessageDraft) -> Self {
        Self {
            position,
            sender: draft.sender,
            body: draft.body,
            kind: draft.kind,
            received_at: Utc::now(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.kind == MessageKind::System
    }

    pub fn format_timestamp(&self) -> String {
        self.received_at.format("%H:%M").to_string()
    }
}
