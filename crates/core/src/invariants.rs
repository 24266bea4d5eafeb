//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::models::Room;

/// Validate that a room's state is internally consistent
pub fn assert_room_invariants(room: &Room) {
    // Participant ids are unique
    let mut seen = HashSet::with_capacity(room.participants.len());
    for participant in &room.participants {
        debug_assert!(
            seen.insert(&participant.id),
            "Room {} has duplicate participant {}",
            room.code,
            participant.id
        );
        debug_assert!(
            !participant.name.trim().is_empty(),
            "Room {} participant {} has empty name",
            room.code,
            participant.id
        );
    }

    // Host, when set, is a member
    if let Some(host) = &room.host {
        debug_assert!(
            room.is_member(host),
            "Room {} host {} is not a participant",
            room.code,
            host
        );
    }

    assert_message_log_invariants(room);
}

/// Validate that message positions are exactly the append order
pub fn assert_message_log_invariants(room: &Room) {
    for (index, message) in room.messages.iter().enumerate() {
        debug_assert!(
            message.position == index,
            "Room {} message at index {} has position {}",
            room.code,
            index,
            message.position
        );
    }
}
