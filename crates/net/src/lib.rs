//! Huddle Network Library
//!
//! Transport boundary for the room client.
//!
//! # Architecture
//!
//! - **Client**: TCP event connection to the room server
//! - **RoomsApi**: HTTP call that creates a room and returns its code
//! - **Protocol**: Length-prefixed JSON envelopes (`{ event, data }`)
//!
//! # Usage
//!
//! ```ignore
//! let code = RoomsApi::new("http://localhost:3000").create_room("Ann").await?;
//! let mut client = Client::connect("127.0.0.1:3001").await?;
//! client.join_room(&code, "Ann").await?;
//!
//! while let Some(event) = client.next_event().await {
//!     match event {
//!         ServerEvent::Room(envelope) => { /* hand to the engine */ }
//!         _ => {}
//!     }
//! }
//! ```

pub mod client;
pub mod error;
mod frame;
pub mod protocol;
pub mod rooms;

pub use client::{Client, ServerEvent};
pub use error::{Error, Result};
pub use protocol::Envelope;
pub use rooms::RoomsApi;

/// Default port for the event connection
pub const DEFAULT_PORT: u16 = 3001;
