//! Copying the room code to the system clipboard
//!
//! The native clipboard (arboard) is tried first. Under Wayland, where
//! arboard often has no access, the code is piped to `wl-copy` instead.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{anyhow, bail, Context, Result};
use huddle_core::RoomCode;
use tracing::debug;

/// Put the room code on the clipboard. The error says why every
/// available method failed.
pub fn copy_room_code(code: &RoomCode) -> Result<()> {
    let native = match arboard::Clipboard::new().and_then(|mut c| c.set_text(code.as_str())) {
        Ok(()) => {
            debug!(room = %code, "Copied via arboard");
            return Ok(());
        }
        Err(e) => e.to_string(),
    };

    if std::env::var_os("WAYLAND_DISPLAY").is_none() {
        return Err(anyhow!("no clipboard available: {}", native));
    }

    pipe_to_command("wl-copy", &[], code.as_str())
        .with_context(|| format!("clipboard unavailable ({}) and wl-copy failed", native))?;
    debug!(room = %code, "Copied via wl-copy");
    Ok(())
}

/// Run `program`, feed `text` on stdin, and wait for a clean exit.
/// The child is always reaped, including when the write fails.
fn pipe_to_command(program: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to start {}", program))?;

    // Dropping stdin at the end of the arm closes the pipe
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    if let Err(e) = written {
        let _ = child.kill();
        let _ = child.wait();
        return Err(e).with_context(|| format!("failed to write to {}", program));
    }

    let status = child
        .wait()
        .with_context(|| format!("{} did not finish", program))?;
    if !status.success() {
        bail!("{} exited with {}", program, status);
    }
    Ok(())
}
