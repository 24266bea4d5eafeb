//! Participant model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Server-assigned participant identifier, stable for the session
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Parse an identifier from the wire. Surrounding whitespace is dropped.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidParticipantId(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A member of a room.
///
/// The display name is not unique: two participants may share it.
/// Membership is keyed on `id` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

impl Participant {
    pub fn new(id: ParticipantId, name: &str) -> Result<Self> {
        Ok(Self {
            id,
            name: display_name(name)?,
        })
    }

    /// Build a participant from raw wire fields
    pub fn parse(id: &str, name: &str) -> Result<Self> {
        Self::new(ParticipantId::parse(id)?, name)
    }
}

/// Trim and validate a display name
pub fn display_name(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidDisplayName(raw.to_string()));
    }
    Ok(trimmed.to_string())
}
