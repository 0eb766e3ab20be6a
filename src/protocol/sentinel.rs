//! Resync sentinel (protocol v3).
//!
//! Both ends terminate each logical message with [`RESYNC_SENTINEL`]. Reading
//! anything else where a sentinel belongs means the ends disagree about stream
//! position, so [`expect_sentinel`] fails with a fatal error instead of letting
//! payload bytes be interpreted as framing.

use tokio::io::{AsyncRead, AsyncWrite};

use super::primitives::{read_u32, write_u32};
use super::wire_format::RESYNC_SENTINEL;
use crate::error::{StreamError, StreamResult};

/// Write the sentinel. The caller flushes.
pub async fn write_sentinel<W>(writer: &mut W) -> StreamResult<()>
where
    W: AsyncWrite + Unpin,
{
    write_u32(writer, RESYNC_SENTINEL).await
}

/// Read 4 bytes and require them to be the sentinel.
pub async fn expect_sentinel<R>(reader: &mut R) -> StreamResult<()>
where
    R: AsyncRead + Unpin,
{
    let found = read_u32(reader).await?;
    if found != RESYNC_SENTINEL {
        return Err(StreamError::SentinelMismatch(found));
    }
    Ok(())
}
