//! Error types for Huddle Core

use thiserror::Error;

use crate::event::EventKind;

/// Rejection of a single inbound event. Never fatal to the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Invalid {kind} event: {reason}")]
    Validation { kind: EventKind, reason: String },

    #[error("Unknown event kind: {0}")]
    UnknownKind(String),
}

impl EventError {
    pub fn validation(kind: EventKind, reason: impl Into<String>) -> Self {
        EventError::Validation {
            kind,
            reason: reason.into(),
        }
    }

    /// Kind of the rejected event, when it was recognized
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            EventError::Validation { kind, .. } => Some(*kind),
            EventError::UnknownKind(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid room code: {0:?}")]
    InvalidRoomCode(String),

    #[error("Invalid participant id: {0:?}")]
    InvalidParticipantId(String),

    #[error("Invalid display name: {0:?}")]
    InvalidDisplayName(String),
}

pub type Result<T> = std::result::Result<T, Error>;
