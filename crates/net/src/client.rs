//! TCP client for a room server's event connection
//!
//! The client does not interpret room events. It forwards every envelope in
//! arrival order and only handles the session-level ones itself.

use std::sync::Arc;

use huddle_core::RoomCode;
use tokio::io::{ReadHalf, WriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::frame::{read_frame, write_frame};
use crate::protocol::Envelope;

/// Event received from the server
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// A room event for the reconciliation engine
    Room(Envelope),
    /// Join was rejected (e.g. the room code does not exist). `room` is
    /// the code that was asked for, when a join was outstanding.
    JoinRejected {
        room: Option<RoomCode>,
        reason: String,
    },
    /// Connection lost
    Disconnected,
}

/// Client handle for network operations
pub struct Client {
    state: Arc<RwLock<ClientState>>,
    event_rx: mpsc::Receiver<ServerEvent>,
    cmd_tx: mpsc::Sender<ClientCommand>,
}

struct ClientState {
    /// Room most recently requested by `join_room`
    requested_room: Option<RoomCode>,
}

enum ClientCommand {
    Send(Envelope),
    Disconnect,
}

impl Client {
    /// Open the event connection
    pub async fn connect<A: ToSocketAddrs + std::fmt::Display>(addr: A) -> Result<Self> {
        info!(addr = %addr, "Connecting to server");

        let stream = TcpStream::connect(&addr).await?;
        let (reader, writer) = tokio::io::split(stream);

        let state = Arc::new(RwLock::new(ClientState {
            requested_room: None,
        }));

        let (event_tx, event_rx) = mpsc::channel(64);
        let (cmd_tx, cmd_rx) = mpsc::channel(64);

        tokio::spawn(connection_task(reader, writer, state.clone(), event_tx, cmd_rx));

        Ok(Client {
            state,
            event_rx,
            cmd_tx,
        })
    }

    /// Get the next server event
    pub async fn next_event(&mut self) -> Option<ServerEvent> {
        self.event_rx.recv().await
    }

    /// Ask to join a room. The answer arrives later as a `room-joined`
    /// envelope or a [`ServerEvent::JoinRejected`].
    pub async fn join_room(&self, code: &RoomCode, user_name: &str) -> Result<()> {
        let envelope = Envelope::join_room(code, user_name)?;
        self.state.write().await.requested_room = Some(code.clone());
        self.send(envelope).await
    }

    /// Send a chat message. Blank text is not sent; returns whether it was.
    pub async fn send_message(&self, text: &str) -> Result<bool> {
        match Envelope::send_message(text) {
            Some(envelope) => {
                self.send(envelope).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Tell the server we are leaving the room
    pub async fn leave_room(&self) -> Result<()> {
        self.state.write().await.requested_room = None;
        self.send(Envelope::leave_room()).await
    }

    /// Disconnect from the server
    pub async fn disconnect(&self) {
        let _ = self.cmd_tx.send(ClientCommand::Disconnect).await;
    }

    async fn send(&self, envelope: Envelope) -> Result<()> {
        self.cmd_tx
            .send(ClientCommand::Send(envelope))
            .await
            .map_err(|_| Error::NotConnected)
    }
}

/// Main connection task
///
/// Reads run in their own task so a frame is never cut short by an
/// outgoing command.
async fn connection_task(
    reader: ReadHalf<TcpStream>,
    mut writer: WriteHalf<TcpStream>,
    state: Arc<RwLock<ClientState>>,
    event_tx: mpsc::Sender<ServerEvent>,
    mut cmd_rx: mpsc::Receiver<ClientCommand>,
) {
    let mut read_task = tokio::spawn(read_loop(reader, state.clone(), event_tx.clone()));

    loop {
        tokio::select! {
            // Server side ended
            _ = &mut read_task => break,

            // Outgoing command
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(ClientCommand::Send(envelope)) => {
                        debug!(event = %envelope.event, "Sending");
                        let payload = match envelope.to_bytes() {
                            Ok(payload) => payload,
                            Err(e) => {
                                warn!(event = %envelope.event, error = %e, "Dropping unencodable envelope");
                                continue;
                            }
                        };
                        if let Err(e) = write_frame(&mut writer, &payload).await {
                            warn!(error = %e, "Write error");
                            break;
                        }
                    }
                    Some(ClientCommand::Disconnect) | None => {
                        debug!("Disconnect requested");
                        break;
                    }
                }
            }
        }
    }
    read_task.abort();

    // Cleanup
    state.write().await.requested_room = None;
    let _ = event_tx.send(ServerEvent::Disconnected).await;
    info!("Disconnected from server");
}

async fn read_loop(
    mut reader: ReadHalf<TcpStream>,
    state: Arc<RwLock<ClientState>>,
    event_tx: mpsc::Sender<ServerEvent>,
) {
    loop {
        let payload = match read_frame(&mut reader).await {
            Ok(payload) => payload,
            Err(Error::ConnectionClosed) => {
                debug!("Server closed connection");
                break;
            }
            Err(e) => {
                warn!(error = %e, "Read error");
                break;
            }
        };

        // A bad envelope costs one event, not the connection
        match Envelope::from_bytes(&payload) {
            Ok(envelope) => handle_server_envelope(envelope, &state, &event_tx).await,
            Err(e) => warn!(error = %e, len = payload.len(), "Dropping malformed envelope"),
        }
    }
}

/// Handle an envelope from the server
async fn handle_server_envelope(
    envelope: Envelope,
    state: &Arc<RwLock<ClientState>>,
    event_tx: &mpsc::Sender<ServerEvent>,
) {
    if let Some(reason) = envelope.join_error_reason() {
        let room = state.write().await.requested_room.take();
        warn!(room = ?room.as_ref().map(RoomCode::as_str), reason = %reason, "Join rejected");
        let _ = event_tx.send(ServerEvent::JoinRejected { room, reason }).await;
        return;
    }

    debug!(event = %envelope.event, "Received");
    let _ = event_tx.send(ServerEvent::Room(envelope)).await;
}
