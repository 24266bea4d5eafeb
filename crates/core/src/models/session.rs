//! Local session model

use serde::{Deserialize, Serialize};

use super::{Participant, RoomCode};

/// The person operating this client and the room they are in.
///
/// One session at a time; joining another room replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSession {
    pub user: Participant,
    pub room: RoomCode,
}

impl LocalSession {
    pub fn new(user: Participant, room: RoomCode) -> Self {
        Self { user, room }
    }
}
