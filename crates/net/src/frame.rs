//! Length-prefixed framing for the event connection
//!
//! A frame is a 4-byte big-endian length followed by that many payload
//! bytes. This layer only moves bytes: a frame whose payload is not a valid
//! [`Envelope`](crate::protocol::Envelope) is still a good frame, and the
//! caller decides what to do with it.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};

/// Upper bound on a single payload. A larger length prefix means the
/// stream is out of sync.
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

fn closed_on_eof(e: io::Error) -> Error {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::ConnectionClosed,
        _ => Error::Io(e),
    }
}

/// Read one frame and return its raw payload.
///
/// Errors here are all fatal to the connection: EOF, I/O failure, or a
/// length prefix that is zero or over [`MAX_FRAME_LEN`].
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>> {
    let len = reader.read_u32().await.map_err(closed_on_eof)? as usize;
    if len == 0 || len > MAX_FRAME_LEN {
        return Err(Error::Protocol(format!(
            "Bad frame length {} (allowed 1..={})",
            len, MAX_FRAME_LEN
        )));
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await.map_err(closed_on_eof)?;
    Ok(payload)
}

/// Write one frame and flush it
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> Result<()> {
    if payload.is_empty() || payload.len() > MAX_FRAME_LEN {
        return Err(Error::Protocol(format!(
            "Refusing to send a {} byte frame",
            payload.len()
        )));
    }
    writer.write_u32(payload.len() as u32).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}
