//! Application state management
//!
//! Owns the reconciliation engine for the current session and turns
//! server events into printable output.

use huddle_core::{Reconciler, RoomCode};
use huddle_net::ServerEvent;
use tracing::{debug, warn};

use crate::render;

/// Result of handling one server event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Lines to print (possibly none)
    Lines(Vec<String>),
    /// The server refused the join; the session cannot continue
    JoinFailed {
        room: Option<RoomCode>,
        reason: String,
    },
    /// Connection is gone; room state has been discarded
    Closed,
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    engine: Reconciler,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_server_event(&mut self, event: ServerEvent) -> Step {
        match event {
            ServerEvent::Room(envelope) => {
                match self.engine.apply_wire(&envelope.event, envelope.data) {
                    Ok(change) => {
                        debug!(change = ?change, "Applied");
                        Step::Lines(render::render_change(&change, self.engine.store()))
                    }
                    // Already logged by the engine; last good state is kept
                    Err(_) => Step::Lines(Vec::new()),
                }
            }
            ServerEvent::JoinRejected { room, reason } => {
                warn!(room = ?room.as_ref().map(RoomCode::as_str), reason = %reason, "Join failed");
                self.engine.leave();
                Step::JoinFailed { room, reason }
            }
            ServerEvent::Disconnected => {
                self.engine.leave();
                Step::Closed
            }
        }
    }

    /// Code of the joined room
    pub fn room_code(&self) -> Option<&RoomCode> {
        self.engine.store().code()
    }

    pub fn is_joined(&self) -> bool {
        self.engine.store().is_open()
    }

    pub fn who(&self) -> Vec<String> {
        render::render_who(self.engine.store(), self.engine.session())
    }

    /// Discard the room wholesale
    pub fn leave(&mut self) {
        self.engine.leave();
    }

    pub fn engine(&self) -> &Reconciler {
        &self.engine
    }
}
