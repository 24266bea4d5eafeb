//! Room State Store
//!
//! Owns the local view of the joined room. Every mutation goes through
//! here; inputs are already validated, so each operation either applies
//! fully or is a no-op.

use tracing::debug;

use crate::event::{HostRef, Snapshot};
use crate::invariants::assert_room_invariants;
use crate::models::{Message, MessageDraft, Participant, ParticipantId, Room, RoomCode};

#[derive(Debug, Default)]
pub struct RoomStore {
    room: Option<Room>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any existing room wholesale. Nothing carries over.
    pub fn initialize(&mut self, snapshot: Snapshot) -> &Room {
        let Snapshot {
            code,
            host,
            participants: snapshot_participants,
            messages: drafts,
        } = snapshot;

        let mut participants: Vec<Participant> = Vec::with_capacity(snapshot_participants.len());
        for participant in snapshot_participants {
            if participants.iter().any(|p| p.id == participant.id) {
                debug!(room = %code, participant = %participant.id, "Dropping duplicate snapshot participant");
                continue;
            }
            participants.push(participant);
        }

        let host = match host {
            Some(HostRef::Participant(h)) => {
                let id = h.id.clone();
                if !participants.iter().any(|p| p.id == id) {
                    participants.insert(0, h);
                }
                Some(id)
            }
            Some(HostRef::Id(id)) if participants.iter().any(|p| p.id == id) => Some(id),
            Some(HostRef::Id(id)) => {
                debug!(room = %code, host = %id, "Snapshot host is not a participant");
                None
            }
            None => None,
        };

        let messages = drafts
            .into_iter()
            .enumerate()
            .map(|(position, draft)| Message::from_draft(position, draft))
            .collect();

        let room = self.room.insert(Room {
            code,
            host,
            participants,
            messages,
        });
        assert_room_invariants(room);
        room
    }

    /// Insert by id. Returns `false` if the id is already present or no room
    /// is open.
    pub fn add_participant(&mut self, participant: Participant) -> bool {
        let Some(room) = self.room.as_mut() else {
            return false;
        };
        if room.is_member(&participant.id) {
            return false;
        }
        room.participants.push(participant);
        assert_room_invariants(room);
        true
    }

    /// Remove by id. An absent id leaves the set untouched.
    pub fn remove_participant(&mut self, id: &ParticipantId) -> Option<Participant> {
        let room = self.room.as_mut()?;
        let index = room.participants.iter().position(|p| &p.id == id)?;
        let removed = room.participants.remove(index);
        if room.host.as_ref() == Some(id) {
            room.host = None;
        }
        assert_room_invariants(room);
        Some(removed)
    }

    /// Append to the end of the log, returning the new message's position.
    pub fn append_message(&mut self, draft: MessageDraft) -> Option<usize> {
        let room = self.room.as_mut()?;
        let position = room.messages.len();
        room.messages.push(Message::from_draft(position, draft));
        assert_room_invariants(room);
        Some(position)
    }

    /// Drop the room (leave or disconnect)
    pub fn clear(&mut self) -> Option<Room> {
        self.room.take()
    }

    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.room.is_some()
    }

    pub fn code(&self) -> Option<&RoomCode> {
        self.room.as_ref().map(|r| &r.code)
    }

    pub fn host(&self) -> Option<&Participant> {
        self.room.as_ref().and_then(Room::host_participant)
    }

    pub fn participants(&self) -> &[Participant] {
        self.room
            .as_ref()
            .map(|r| r.participants.as_slice())
            .unwrap_or_default()
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.room.as_ref().and_then(|r| r.participant(id))
    }

    pub fn messages(&self) -> &[Message] {
        self.room
            .as_ref()
            .map(|r| r.messages.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(id: &str, name: &str) -> Participant {
        Participant::parse(id, name).unwrap()
    }

    fn snapshot(code: &str, host: Option<HostRef>, participants: &[(&str, &str)]) -> Snapshot {
        Snapshot {
            code: RoomCode::parse(code).unwrap(),
            host,
            participants: participants.iter().map(|(i, n)| participant(i, n)).collect(),
            messages: vec![MessageDraft::chat("Ann", "earlier")],
        }
    }

    #[test]
    fn test_initialize_replaces_everything() {
        let mut store = RoomStore::new();
        store.initialize(snapshot("AAAA", None, &[("1", "Ann"), ("2", "Ben")]));
        store.append_message(MessageDraft::chat("Ben", "hello"));

        store.initialize(snapshot("BBBB", None, &[("9", "Zoe")]));

        assert_eq!(store.code().unwrap().as_str(), "BBBB");
        assert_eq!(store.participants(), &[participant("9", "Zoe")]);
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].body, "earlier");
    }

    #[test]
    fn test_initialize_collapses_duplicate_ids() {
        let mut store = RoomStore::new();
        store.initialize(snapshot("AAAA", None, &[("1", "Ann"), ("1", "Ann again")]));
        assert_eq!(store.participants(), &[participant("1", "Ann")]);
    }

    #[test]
    fn test_host_inserted_when_missing() {
        let mut store = RoomStore::new();
        let host = HostRef::Participant(participant("7", "Hal"));
        store.initialize(snapshot("AAAA", Some(host), &[("1", "Ann")]));

        assert_eq!(store.participants().len(), 2);
        assert_eq!(store.host().unwrap().name, "Hal");
    }

    #[test]
    fn test_unknown_bare_host_is_unset() {
        let mut store = RoomStore::new();
        let host = HostRef::Id(ParticipantId::parse("7").unwrap());
        store.initialize(snapshot("AAAA", Some(host), &[("1", "Ann")]));

        assert!(store.room().unwrap().host.is_none());
        assert_eq!(store.participants().len(), 1);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut store = RoomStore::new();
        store.initialize(snapshot("AAAA", None, &[("1", "Ann")]));

        assert!(store.add_participant(participant("2", "Ben")));
        assert!(!store.add_participant(participant("2", "Ben")));
        assert_eq!(store.participants().len(), 2);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = RoomStore::new();
        store.initialize(snapshot("AAAA", None, &[("1", "Ann"), ("2", "Ben")]));

        let missing = ParticipantId::parse("3").unwrap();
        assert!(store.remove_participant(&missing).is_none());
        assert_eq!(store.participants().len(), 2);
    }

    #[test]
    fn test_removing_host_clears_host() {
        let mut store = RoomStore::new();
        let host = HostRef::Id(ParticipantId::parse("1").unwrap());
        store.initialize(snapshot("AAAA", Some(host), &[("1", "Ann"), ("2", "Ben")]));
        assert_eq!(store.host().unwrap().name, "Ann");

        store.remove_participant(&ParticipantId::parse("1").unwrap());
        assert!(store.host().is_none());
        assert!(store.room().unwrap().host.is_none());
    }

    #[test]
    fn test_append_positions_follow_arrival() {
        let mut store = RoomStore::new();
        store.initialize(snapshot("AAAA", None, &[]));

        assert_eq!(store.append_message(MessageDraft::chat("Ann", "one")), Some(1));
        assert_eq!(store.append_message(MessageDraft::chat("Ann", "one")), Some(2));
        let positions: Vec<usize> = store.messages().iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_mutations_without_room_are_noops() {
        let mut store = RoomStore::new();
        assert!(!store.add_participant(participant("1", "Ann")));
        assert!(store.remove_participant(&ParticipantId::parse("1").unwrap()).is_none());
        assert!(store.append_message(MessageDraft::chat("Ann", "hi")).is_none());
        assert!(store.participants().is_empty());
        assert!(store.messages().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut store = RoomStore::new();
        store.initialize(snapshot("AAAA", None, &[("1", "Ann")]));
        let room = store.clear().unwrap();
        assert_eq!(room.code.as_str(), "AAAA");
        assert!(!store.is_open());
    }
}
