//! Fixed-width integer and exact-length byte I/O.
//!
//! Every function here either moves exactly the requested number of bytes or
//! fails with a [`StreamError`]. There is no partial success: the framing has
//! no way to recover from byte-level misalignment.

use std::io::ErrorKind;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::wire_format::U32_SIZE;
use crate::error::{StreamError, StreamResult};

/// Encode `value` big-endian and write it.
pub async fn write_u32<W>(writer: &mut W, value: u32) -> StreamResult<()>
where
    W: AsyncWrite + Unpin,
{
    strict_write(writer, &value.to_be_bytes()).await
}

/// Read exactly 4 bytes and decode them big-endian.
pub async fn read_u32<R>(reader: &mut R) -> StreamResult<u32>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; U32_SIZE];
    strict_read(reader, &mut buf).await?;
    Ok(u32::from_be_bytes(buf))
}

/// Read a u32, or `None` if the stream ended cleanly before its first byte.
///
/// Used at message boundaries, where end-of-stream means the host went away
/// rather than a truncated field.
pub async fn try_read_u32<R>(reader: &mut R) -> StreamResult<Option<u32>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; U32_SIZE];
    let filled = fill(reader, &mut buf).await?;
    match filled {
        0 => Ok(None),
        U32_SIZE => Ok(Some(u32::from_be_bytes(buf))),
        actual => Err(StreamError::ShortRead {
            expected: U32_SIZE,
            actual,
        }),
    }
}

/// Write the whole of `buf`.
///
/// # Errors
///
/// `ShortWrite` if the writer stops accepting bytes early.
pub async fn strict_write<W>(writer: &mut W, buf: &[u8]) -> StreamResult<()>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while written < buf.len() {
        match writer.write(&buf[written..]).await {
            Ok(0) => {
                return Err(StreamError::ShortWrite {
                    expected: buf.len(),
                    actual: written,
                })
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(StreamError::Io(e)),
        }
    }
    Ok(())
}

/// Fill the whole of `buf`.
///
/// # Errors
///
/// `ShortRead` if the stream ends before `buf.len()` bytes arrive.
pub async fn strict_read<R>(reader: &mut R, buf: &mut [u8]) -> StreamResult<()>
where
    R: AsyncRead + Unpin,
{
    let filled = fill(reader, buf).await?;
    if filled != buf.len() {
        return Err(StreamError::ShortRead {
            expected: buf.len(),
            actual: filled,
        });
    }
    Ok(())
}

/// Read until `buf` is full or the stream ends. Returns the bytes filled.
async fn fill<R>(reader: &mut R, buf: &mut [u8]) -> StreamResult<usize>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]).await {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(StreamError::Io(e)),
        }
    }
    Ok(filled)
}
