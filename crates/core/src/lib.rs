//! Huddle Core Library
//!
//! Room model, the Room State Store, and the Event Reconciliation Engine
//! that keeps a client's view of one chat room consistent with the event
//! stream from the server.

pub mod engine;
pub mod error;
pub mod event;
pub mod invariants;
pub mod models;
pub mod store;

pub use engine::{Change, IgnoreReason, Reconciler};
pub use error::{Error, EventError, Result};
pub use event::{EventKind, ParticipantRef, RoomEvent};
pub use models::*;
pub use store::RoomStore;
