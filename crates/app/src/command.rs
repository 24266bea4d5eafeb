//! Input line parsing

/// What the user typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: send as a chat message
    Say(String),
    /// `/copy`: copy the room code
    Copy,
    /// `/who`: list participants
    Who,
    /// `/leave` or `/quit`
    Leave,
    /// `/help`
    Help,
    /// Blank line
    Nothing,
    /// Unrecognized slash command
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Nothing;
        }

        // `//text` sends a message starting with a slash
        if let Some(rest) = line.strip_prefix("//") {
            return Command::Say(format!("/{}", rest));
        }

        match line {
            "/copy" => Command::Copy,
            "/who" => Command::Who,
            "/leave" | "/quit" => Command::Leave,
            "/help" => Command::Help,
            _ if line.starts_with('/') => Command::Unknown(line.to_string()),
            _ => Command::Say(line.to_string()),
        }
    }
}

pub const HELP: &str = "Commands: /copy (copy room code), /who (list users), /leave, /help. Start a message with // to send a leading slash.";
