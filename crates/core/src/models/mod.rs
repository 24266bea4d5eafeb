//! Data models for Huddle

mod message;
mod participant;
mod room;
mod session;

pub use message::*;
pub use participant::*;
pub use room::*;
pub use session::*;
