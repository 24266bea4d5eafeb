//! Event Reconciliation Engine
//!
//! Maps each inbound [`RoomEvent`] to a transition on the [`RoomStore`] and
//! reports what changed. Events are applied strictly in the order they are
//! handed in. Duplicate joins and late leaves are absorbed; malformed
//! events are rejected without touching state.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::EventError;
use crate::event::{
    EventKind, JoinedPayload, LeftPayload, MessagePayload, RoomEvent, SnapshotPayload,
};
use crate::models::{LocalSession, MessageDraft, Participant, RoomCode};
use crate::store::RoomStore;

/// Why an event caused no change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Join for an id that is already a member
    DuplicateParticipant,
    /// Leave for an id that is not a member
    UnknownParticipant,
    /// Delta arrived while no room is open
    NoActiveRoom,
}

/// What an applied event changed, for the rendering layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    RoomReplaced {
        code: RoomCode,
        participants: usize,
        messages: usize,
    },
    ParticipantAdded {
        participant: Participant,
        /// Position of the "joined" announcement
        announcement: usize,
    },
    ParticipantRemoved {
        participant: Participant,
        /// Position of the "left" announcement
        announcement: usize,
    },
    MessageAppended {
        position: usize,
    },
    Ignored(IgnoreReason),
}

/// Owns the room state for one client session
#[derive(Debug, Default)]
pub struct Reconciler {
    store: RoomStore,
    session: Option<LocalSession>,
    last_rejection: Option<EventError>,
    rejected: u64,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a transport envelope and apply it
    pub fn apply_wire(&mut self, name: &str, data: Value) -> Result<Change, EventError> {
        match RoomEvent::decode(name, data) {
            Ok(event) => self.apply(event),
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Apply one event
    pub fn apply(&mut self, event: RoomEvent) -> Result<Change, EventError> {
        let result = match &event {
            RoomEvent::RoomSnapshot(payload) => self.apply_snapshot(payload),
            RoomEvent::ParticipantJoined(payload) => self.apply_joined(payload),
            RoomEvent::ParticipantLeft(payload) => self.apply_left(payload),
            RoomEvent::ChatMessage(payload) => self.apply_message(payload),
        };
        result.map_err(|e| self.reject(e))
    }

    fn apply_snapshot(&mut self, payload: &SnapshotPayload) -> Result<Change, EventError> {
        let (snapshot, session) = payload.validate()?;

        if let Some(previous) = self.store.code() {
            info!(previous = %previous, room = %snapshot.code, "Replacing room state");
        }

        let room = self.store.initialize(snapshot);
        let change = Change::RoomReplaced {
            code: room.code.clone(),
            participants: room.participants.len(),
            messages: room.messages.len(),
        };
        info!(
            room = %room.code,
            user = %session.user.id,
            participants = room.participants.len(),
            messages = room.messages.len(),
            "Joined room"
        );
        self.session = Some(session);
        Ok(change)
    }

    fn apply_joined(&mut self, payload: &JoinedPayload) -> Result<Change, EventError> {
        let participant = payload.validate()?;
        if !self.store.is_open() {
            return Ok(self.ignore(IgnoreReason::NoActiveRoom));
        }

        if !self.store.add_participant(participant.clone()) {
            debug!(participant = %participant.id, "Duplicate join absorbed");
            return Ok(self.ignore(IgnoreReason::DuplicateParticipant));
        }

        let Some(announcement) = self.store.append_message(MessageDraft::joined(&participant.name))
        else {
            return Ok(self.ignore(IgnoreReason::NoActiveRoom));
        };
        debug!(participant = %participant.id, name = %participant.name, "Participant joined");
        Ok(Change::ParticipantAdded {
            participant,
            announcement,
        })
    }

    fn apply_left(&mut self, payload: &LeftPayload) -> Result<Change, EventError> {
        let id = payload.validate()?;
        if !self.store.is_open() {
            return Ok(self.ignore(IgnoreReason::NoActiveRoom));
        }

        let Some(participant) = self.store.remove_participant(&id) else {
            debug!(participant = %id, "Leave for absent participant absorbed");
            return Ok(self.ignore(IgnoreReason::UnknownParticipant));
        };

        // Announce with the stored name; the event's name is not trusted for identity
        let Some(announcement) = self.store.append_message(MessageDraft::left(&participant.name))
        else {
            return Ok(self.ignore(IgnoreReason::NoActiveRoom));
        };
        debug!(participant = %participant.id, name = %participant.name, "Participant left");
        Ok(Change::ParticipantRemoved {
            participant,
            announcement,
        })
    }

    fn apply_message(&mut self, payload: &MessagePayload) -> Result<Change, EventError> {
        let draft = payload.validate(EventKind::ChatMessage)?;
        match self.store.append_message(draft) {
            Some(position) => Ok(Change::MessageAppended { position }),
            None => Ok(self.ignore(IgnoreReason::NoActiveRoom)),
        }
    }

    fn ignore(&self, reason: IgnoreReason) -> Change {
        if reason == IgnoreReason::NoActiveRoom {
            warn!("Dropping room delta with no active room");
        }
        Change::Ignored(reason)
    }

    fn reject(&mut self, error: EventError) -> EventError {
        warn!(error = %error, "Rejected event");
        self.rejected += 1;
        self.last_rejection = Some(error.clone());
        error
    }

    /// Leave the room: discard room state and session together
    pub fn leave(&mut self) {
        if let Some(room) = self.store.clear() {
            info!(room = %room.code, "Left room");
        }
        self.session = None;
    }

    pub fn store(&self) -> &RoomStore {
        &self.store
    }

    pub fn session(&self) -> Option<&LocalSession> {
        self.session.as_ref()
    }

    /// Most recent rejected event
    pub fn last_rejection(&self) -> Option<&EventError> {
        self.last_rejection.as_ref()
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, ParticipantRef};
    use crate::models::MessageKind;

    fn joined_room() -> Reconciler {
        let mut engine = Reconciler::new();
        engine
            .apply(RoomEvent::snapshot(
                "abcd",
                Some(ParticipantRef::Id("1".into())),
                &[("1", "Ann")],
                ("1", "Ann"),
            ))
            .unwrap();
        engine
    }

    #[test]
    fn test_snapshot_sets_session() {
        let engine = joined_room();
        let session = engine.session().unwrap();
        assert_eq!(session.room.as_str(), "ABCD");
        assert_eq!(session.user.name, "Ann");
        assert_eq!(engine.store().host().unwrap().name, "Ann");
    }

    #[test]
    fn test_join_announces_once() {
        let mut engine = joined_room();

        let first = engine.apply(RoomEvent::joined("2", "Ben")).unwrap();
        assert!(matches!(first, Change::ParticipantAdded { announcement: 0, .. }));

        let again = engine.apply(RoomEvent::joined("2", "Ben")).unwrap();
        assert_eq!(again, Change::Ignored(IgnoreReason::DuplicateParticipant));

        let messages = engine.store().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body, "Ben joined the room");
        assert_eq!(messages[0].kind, MessageKind::System);
    }

    #[test]
    fn test_leave_uses_stored_name() {
        let mut engine = joined_room();
        engine.apply(RoomEvent::joined("2", "Ben")).unwrap();

        let change = engine.apply(RoomEvent::left("2", "Someone Else")).unwrap();
        let Change::ParticipantRemoved { participant, .. } = change else {
            panic!("Expected removal");
        };
        assert_eq!(participant.name, "Ben");
        assert_eq!(engine.store().messages().last().unwrap().body, "Ben left the room");
    }

    #[test]
    fn test_late_leave_absorbed() {
        let mut engine = joined_room();
        let change = engine.apply(RoomEvent::left("2", "Ben")).unwrap();
        assert_eq!(change, Change::Ignored(IgnoreReason::UnknownParticipant));
        assert!(engine.store().messages().is_empty());
        assert_eq!(engine.rejected_count(), 0);
    }

    #[test]
    fn test_deltas_before_snapshot_ignored() {
        let mut engine = Reconciler::new();
        assert_eq!(
            engine.apply(RoomEvent::joined("2", "Ben")).unwrap(),
            Change::Ignored(IgnoreReason::NoActiveRoom)
        );
        assert_eq!(
            engine.apply(RoomEvent::chat("Ben", "hi")).unwrap(),
            Change::Ignored(IgnoreReason::NoActiveRoom)
        );
        assert!(!engine.store().is_open());
    }

    #[test]
    fn test_rejection_recorded() {
        let mut engine = joined_room();
        let err = engine.apply(RoomEvent::joined("", "Ben")).unwrap_err();
        assert_eq!(err.kind(), Some(EventKind::ParticipantJoined));
        assert_eq!(engine.last_rejection(), Some(&err));
        assert_eq!(engine.rejected_count(), 1);
        assert_eq!(engine.store().participants().len(), 1);
    }

    #[test]
    fn test_unknown_wire_kind_rejected() {
        let mut engine = joined_room();
        let err = engine
            .apply_wire("typing", serde_json::json!({"userId": "1"}))
            .unwrap_err();
        assert_eq!(err, EventError::UnknownKind("typing".into()));
        assert_eq!(engine.rejected_count(), 1);
    }

    #[test]
    fn test_apply_wire_message() {
        let mut engine = joined_room();
        let change = engine
            .apply_wire(
                "new-message",
                serde_json::json!({"sender": "Ann", "message": "hello", "type": "chat"}),
            )
            .unwrap();
        assert_eq!(change, Change::MessageAppended { position: 0 });
    }

    #[test]
    fn test_leave_discards_everything() {
        let mut engine = joined_room();
        engine.apply(RoomEvent::chat("Ann", "hi")).unwrap();
        engine.leave();

        assert!(engine.session().is_none());
        assert!(!engine.store().is_open());
        assert!(engine.store().messages().is_empty());
    }
}
