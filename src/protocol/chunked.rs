//! Pull-paced transfer of variable-length payloads.
//!
//! A payload travels as its u32 length followed by chunks of at most
//! [`CHUNK_SIZE`] bytes. The first chunk is sent unsolicited; every further
//! chunk waits for one ready signal from the receiver:
//!
//! ```text
//! sender                         receiver
//!   length, chunk 0  ──────────►
//!                    ◄──────────  ready
//!   chunk 1          ──────────►
//!                    ◄──────────  ready
//!   chunk 2          ──────────►
//! ```
//!
//! The exchange is symmetric: the worker receives request payloads and sends
//! response payloads with the same code, so both directions need the reader
//! and the writer.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use super::primitives::{read_u32, strict_read, strict_write, write_u32};
use super::wire_format::{CHUNK_SIZE, READY_SIGNAL};
use crate::error::{StreamError, StreamResult};

/// Send `payload` to the peer, pacing chunks on its ready signals.
pub async fn write_variable<R, W>(reader: &mut R, writer: &mut W, payload: &[u8]) -> StreamResult<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let size = u32::try_from(payload.len()).map_err(|_| StreamError::PayloadTooLarge {
        size: payload.len(),
        max: u32::MAX as usize,
    })?;

    write_u32(writer, size).await?;

    let mut chunks = payload.chunks(CHUNK_SIZE);
    if let Some(first) = chunks.next() {
        strict_write(writer, first).await?;
    }
    writer.flush().await?;

    for chunk in chunks {
        // Value is irrelevant, arrival is the pull.
        let _ready = read_u32(reader).await?;
        strict_write(writer, chunk).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Receive a payload from the peer, sending a ready signal before each chunk
/// after the first.
///
/// # Errors
///
/// `PayloadTooLarge` if the announced length exceeds `max_size`; nothing past
/// the length is consumed in that case.
pub async fn read_variable<R, W>(reader: &mut R, writer: &mut W, max_size: usize) -> StreamResult<Bytes>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let size = read_u32(reader).await? as usize;
    if size > max_size {
        return Err(StreamError::PayloadTooLarge {
            size,
            max: max_size,
        });
    }

    let mut buf = BytesMut::zeroed(size);
    for (index, chunk) in buf.chunks_mut(CHUNK_SIZE).enumerate() {
        if index > 0 {
            write_u32(writer, READY_SIGNAL).await?;
            writer.flush().await?;
        }
        strict_read(reader, chunk).await?;
    }

    Ok(buf.freeze())
}
