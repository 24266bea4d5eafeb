//! Randomized join/leave/chat interleavings over a small id pool

use std::collections::HashSet;

use huddle_core::{Change, IgnoreReason, Reconciler, RoomEvent};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Join(u8),
    Leave(u8),
    Chat(u8, String),
}

impl Step {
    fn event(&self) -> RoomEvent {
        match self {
            Step::Join(n) => RoomEvent::joined(&id(*n), &name(*n)),
            Step::Leave(n) => RoomEvent::left(&id(*n), &name(*n)),
            Step::Chat(n, text) => RoomEvent::chat(&name(*n), text),
        }
    }
}

fn id(n: u8) -> String {
    format!("p{}", n)
}

fn name(n: u8) -> String {
    format!("User{}", n)
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..4u8).prop_map(Step::Join),
        (0..4u8).prop_map(Step::Leave),
        (0..4u8, "[a-z]{1,8}").prop_map(|(n, text)| Step::Chat(n, text)),
    ]
}

fn steps() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(step(), 0..64)
}

fn open_room() -> Reconciler {
    let mut engine = Reconciler::new();
    engine
        .apply(RoomEvent::snapshot("prop", None, &[("p0", "User0")], ("p0", "User0")))
        .unwrap();
    engine
}

fn is_member(engine: &Reconciler, n: u8) -> bool {
    engine
        .store()
        .participants()
        .iter()
        .any(|p| p.id.as_str() == id(n))
}

proptest! {
    #[test]
    fn participant_ids_stay_unique(steps in steps()) {
        let mut engine = open_room();
        for step in &steps {
            engine.apply(step.event()).unwrap();

            let participants = engine.store().participants();
            let unique: HashSet<_> = participants.iter().map(|p| &p.id).collect();
            prop_assert_eq!(unique.len(), participants.len());
        }
    }

    #[test]
    fn leave_for_absent_id_changes_nothing(steps in steps()) {
        let mut engine = open_room();
        for step in &steps {
            let absent_leave = matches!(step, Step::Leave(n) if !is_member(&engine, *n));
            let participants = engine.store().participants().to_vec();
            let log_len = engine.store().messages().len();

            let change = engine.apply(step.event()).unwrap();

            if absent_leave {
                prop_assert_eq!(change, Change::Ignored(IgnoreReason::UnknownParticipant));
                prop_assert_eq!(engine.store().participants(), participants.as_slice());
                prop_assert_eq!(engine.store().messages().len(), log_len);
            }
        }
    }

    #[test]
    fn chat_log_matches_delivery(steps in steps()) {
        let mut engine = open_room();
        let mut delivered = Vec::new();
        for step in &steps {
            if let Step::Chat(n, text) = step {
                delivered.push((name(*n), text.clone()));
            }
            engine.apply(step.event()).unwrap();
        }

        let messages = engine.store().messages();
        let logged: Vec<_> = messages
            .iter()
            .filter(|m| !m.is_system())
            .map(|m| (m.sender.clone(), m.body.clone()))
            .collect();
        prop_assert_eq!(logged, delivered);

        for (index, message) in messages.iter().enumerate() {
            prop_assert_eq!(message.position, index);
        }
    }
}
