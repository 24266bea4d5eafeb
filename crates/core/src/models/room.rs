//! Room model - one joined chat room

use serde::{Deserialize, Serialize};

use super::{Message, Participant, ParticipantId};
use crate::error::{Error, Result};

/// Opaque room code, always stored trimmed and uppercase.
///
/// Input is case-insensitive: `"abcd"` and `"ABCD"` name the same room.
/// The server owns the format, so anything non-blank is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    pub fn parse(raw: &str) -> Result<Self> {
        let code = raw.trim();
        if code.is_empty() {
            return Err(Error::InvalidRoomCode(raw.to_string()));
        }
        Ok(Self(code.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for RoomCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Local view of a joined room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub code: RoomCode,
    /// Current host, cleared once the host leaves
    pub host: Option<ParticipantId>,
    /// Members in arrival order, unique by id
    pub participants: Vec<Participant>,
    /// Append-only log
    pub messages: Vec<Message>,
}

impl Room {
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    pub fn is_member(&self, id: &ParticipantId) -> bool {
        self.participant(id).is_some()
    }

    /// Host participant, if the host is still present
    pub fn host_participant(&self) -> Option<&Participant> {
        self.host.as_ref().and_then(|id| self.participant(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_normalized_to_uppercase() {
        let lower = RoomCode::parse("abcd").unwrap();
        let upper = RoomCode::parse("ABCD").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.as_str(), "ABCD");
    }

    #[test]
    fn test_code_trimmed() {
        assert_eq!(RoomCode::parse("  x7k2 ").unwrap().as_str(), "X7K2");
    }

    #[test]
    fn test_blank_codes_rejected() {
        assert!(RoomCode::parse("").is_err());
        assert!(RoomCode::parse(" \t ").is_err());
    }

    #[test]
    fn test_server_formats_accepted() {
        assert_eq!(RoomCode::parse("room-1").unwrap().as_str(), "ROOM-1");
        assert_eq!(RoomCode::parse("a_b.c").unwrap().as_str(), "A_B.C");
        let long = "k".repeat(40);
        assert_eq!(RoomCode::parse(&long).unwrap().as_str(), long.to_uppercase());
    }

    #[test]
    fn test_code_deserializes_normalized() {
        let code: RoomCode = serde_json::from_str("\"qwer\"").unwrap();
        assert_eq!(code.as_str(), "QWER");
        assert!(serde_json::from_str::<RoomCode>("\"  \"").is_err());
    }
}
