//! Versioned channel over an inbound/outbound byte-stream pair.
//!
//! [`Channel`] owns both halves of the connection because the chunked
//! transfer needs the opposite direction for its ready signals, and carries
//! the [`ProtocolVersion`] so the sentinel is written and checked in exactly
//! one place.
//!
//! The channel is symmetric: the worker and a host (or a test harness playing
//! the host) use the same type on either end of the pipe.
//!
//! # Example
//!
//! ```
//! use fmtwire::protocol::ProtocolVersion;
//! use fmtwire::transport::Channel;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (worker, host) = tokio::io::duplex(4096);
//! let (r, w) = tokio::io::split(worker);
//! let mut worker = Channel::new(r, w, ProtocolVersion::V3);
//! let (r, w) = tokio::io::split(host);
//! let mut host = Channel::new(r, w, ProtocolVersion::V3);
//!
//! worker.write_variable(b"hello").await?;
//! worker.write_sentinel().await?;
//! worker.flush().await?;
//!
//! assert_eq!(&host.read_variable().await?[..], b"hello");
//! host.read_sentinel().await?;
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::error::StreamResult;
use crate::protocol::{self, ProtocolVersion, DEFAULT_MAX_PAYLOAD_SIZE};

/// Both directions of one host connection.
pub struct Channel<R, W> {
    reader: R,
    writer: W,
    version: ProtocolVersion,
    max_payload_size: usize,
}

impl<R, W> Channel<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a channel with the default payload limit.
    pub fn new(reader: R, writer: W, version: ProtocolVersion) -> Self {
        Self {
            reader,
            writer,
            version,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }

    /// Set the maximum inbound payload size.
    pub fn with_max_payload_size(mut self, max_payload_size: usize) -> Self {
        self.max_payload_size = max_payload_size;
        self
    }

    /// Protocol version of this connection.
    #[inline]
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Maximum inbound payload size.
    #[inline]
    pub fn max_payload_size(&self) -> usize {
        self.max_payload_size
    }

    /// Read a u32 field.
    pub async fn read_u32(&mut self) -> StreamResult<u32> {
        protocol::read_u32(&mut self.reader).await
    }

    /// Read a u32 at a message boundary; `None` on clean end-of-stream.
    pub async fn try_read_u32(&mut self) -> StreamResult<Option<u32>> {
        protocol::try_read_u32(&mut self.reader).await
    }

    /// Write a u32 field (not flushed).
    pub async fn write_u32(&mut self, value: u32) -> StreamResult<()> {
        protocol::write_u32(&mut self.writer, value).await
    }

    /// Receive a variable payload.
    pub async fn read_variable(&mut self) -> StreamResult<Bytes> {
        protocol::read_variable(&mut self.reader, &mut self.writer, self.max_payload_size).await
    }

    /// Send a variable payload. Each chunk is flushed.
    pub async fn write_variable(&mut self, payload: &[u8]) -> StreamResult<()> {
        protocol::write_variable(&mut self.reader, &mut self.writer, payload).await
    }

    /// Consume and validate the peer's sentinel (v3 only).
    pub async fn read_sentinel(&mut self) -> StreamResult<()> {
        if self.version.uses_sentinel() {
            protocol::expect_sentinel(&mut self.reader).await?;
        }
        Ok(())
    }

    /// Write the sentinel (v3 only, not flushed).
    pub async fn write_sentinel(&mut self) -> StreamResult<()> {
        if self.version.uses_sentinel() {
            protocol::write_sentinel(&mut self.writer).await?;
        }
        Ok(())
    }

    /// Flush the outbound stream.
    pub async fn flush(&mut self) -> StreamResult<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Split back into the underlying streams.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}
