//! Interactive room session
//!
//! Connects, joins, then drives two inputs until the session ends: server
//! events go through the engine, stdin lines become commands.

use anyhow::{bail, Context, Result};
use huddle_core::RoomCode;
use huddle_net::{Client, RoomsApi};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::clipboard::copy_room_code;
use crate::command::{Command, HELP};
use crate::state::{AppState, Step};

/// How the session enters a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Create a new room hosted by this user, then join it
    Create,
    /// Join an existing room
    Join(RoomCode),
}

pub struct SessionConfig {
    pub server: String,
    pub api_base: String,
    pub name: String,
    pub entry: Entry,
}

pub async fn run(config: SessionConfig) -> Result<()> {
    let code = match config.entry {
        Entry::Create => RoomsApi::new(config.api_base.as_str())
            .create_room(&config.name)
            .await
            .context("Failed to create room")?,
        Entry::Join(code) => code,
    };

    let mut client = Client::connect(config.server.as_str())
        .await
        .with_context(|| format!("Failed to connect to {}", config.server))?;
    client
        .join_room(&code, &config.name)
        .await
        .context("Failed to send join request")?;
    info!(room = %code, name = %config.name, "Join requested");

    let mut state = AppState::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = client.next_event() => {
                let Some(event) = event else { break };
                match state.on_server_event(event) {
                    Step::Lines(out) => {
                        for line in out {
                            println!("{}", line);
                        }
                    }
                    Step::JoinFailed { room, reason } => {
                        client.disconnect().await;
                        bail!("Could not join room {}: {}", room.as_ref().unwrap_or(&code), reason);
                    }
                    Step::Closed => {
                        println!("Disconnected from server.");
                        break;
                    }
                }
            }

            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    // stdin closed
                    leave(&client, &mut state).await;
                    break;
                };
                if !handle_command(Command::parse(&line), &client, &mut state).await? {
                    break;
                }
            }
        }
    }

    info!(
        rejected = state.engine().rejected_count(),
        "Session ended"
    );
    Ok(())
}

/// Returns `false` when the session should end
async fn handle_command(command: Command, client: &Client, state: &mut AppState) -> Result<bool> {
    match command {
        Command::Say(text) => {
            if !state.is_joined() {
                println!("Not in a room yet.");
                return Ok(true);
            }
            client
                .send_message(&text)
                .await
                .context("Failed to send message")?;
        }
        Command::Copy => match state.room_code() {
            Some(code) => match copy_room_code(code) {
                Ok(()) => println!("Copied {}", code),
                Err(e) => println!("Could not copy ({:#}). Room code: {}", e, code),
            },
            None => println!("Not in a room yet."),
        },
        Command::Who => {
            for line in state.who() {
                println!("{}", line);
            }
        }
        Command::Leave => {
            leave(client, state).await;
            return Ok(false);
        }
        Command::Help => println!("{}", HELP),
        Command::Unknown(cmd) => println!("Unknown command {}. {}", cmd, HELP),
        Command::Nothing => {}
    }
    Ok(true)
}

async fn leave(client: &Client, state: &mut AppState) {
    if state.is_joined() {
        if let Err(e) = client.leave_room().await {
            warn!(error = %e, "Failed to send leave");
        }
    }
    state.leave();
    client.disconnect().await;
}
