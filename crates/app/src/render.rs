//! Text projection of room changes
//!
//! Turns the engine's change descriptors into terminal lines. Reads the
//! store, never writes it.

use huddle_core::{Change, LocalSession, Message, RoomStore};

/// One log line: `* text` for system messages, `sender: text` for chat
pub fn format_message(message: &Message) -> String {
    if message.is_system() {
        format!("[{}] * {}", message.format_timestamp(), message.body)
    } else {
        format!(
            "[{}] {}: {}",
            message.format_timestamp(),
            message.sender,
            message.body
        )
    }
}

/// Lines to print for one change
pub fn render_change(change: &Change, store: &RoomStore) -> Vec<String> {
    let line_at = |position: usize| store.messages().get(position).map(format_message);

    match change {
        Change::RoomReplaced { code, .. } => {
            let mut lines = vec![
                format!("Joined room {} (type /copy to copy the code)", code),
                render_user_list(store),
            ];
            lines.extend(store.messages().iter().map(format_message));
            lines
        }
        Change::ParticipantAdded { announcement, .. }
        | Change::ParticipantRemoved { announcement, .. } => {
            line_at(*announcement).into_iter().collect()
        }
        Change::MessageAppended { position } => line_at(*position).into_iter().collect(),
        Change::Ignored(_) => Vec::new(),
    }
}

/// `Users: Ann (host), Ben`
pub fn render_user_list(store: &RoomStore) -> String {
    let host = store.host().map(|h| &h.id);
    let names: Vec<String> = store
        .participants()
        .iter()
        .map(|p| {
            if Some(&p.id) == host {
                format!("{} (host)", p.name)
            } else {
                p.name.clone()
            }
        })
        .collect();
    format!("Users: {}", names.join(", "))
}

/// Participant list for `/who`, one per line, marking the local user
pub fn render_who(store: &RoomStore, session: Option<&LocalSession>) -> Vec<String> {
    let me = session.map(|s| &s.user.id);
    let host = store.host().map(|h| &h.id);
    store
        .participants()
        .iter()
        .map(|p| {
            let mut line = format!("  {}", p.name);
            if Some(&p.id) == host {
                line.push_str(" (host)");
            }
            if Some(&p.id) == me {
                line.push_str(" (you)");
            }
            line
        })
        .collect()
}
