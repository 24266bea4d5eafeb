//! Huddle - terminal client for real-time chat rooms
//!
//! Creates or joins a room and keeps a local view of its members and
//! history in step with the server's event stream.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use huddle_core::RoomCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod clipboard;
mod command;
mod config;
mod render;
mod session;
mod state;

use config::AppConfig;
use session::{Entry, SessionConfig};

#[derive(Parser)]
#[command(name = "huddle", about = "Chat room client")]
struct Cli {
    /// Path to config TOML file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Event server address (host:port)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Room API base URL
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Create a new room and join it as host
    Create {
        /// Display name
        #[arg(long)]
        name: Option<String>,
    },
    /// Join an existing room by code
    Join {
        /// Room code (case-insensitive)
        code: RoomCode,
        /// Display name
        #[arg(long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::info!("Starting Huddle");

    if let Some(server) = cli.server {
        config.server = server;
    }
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }

    let (entry, name) = match cli.command {
        CliCommand::Create { name } => (Entry::Create, name),
        CliCommand::Join { code, name } => (Entry::Join(code), name),
    };
    let name = name
        .or(config.display_name.clone())
        .context("No display name: pass --name or set display_name in the config")?;
    let name = huddle_core::display_name(&name)?;

    session::run(SessionConfig {
        server: config.server,
        api_base: config.api_base,
        name,
        entry,
    })
    .await
}
