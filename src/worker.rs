//! Worker builder and serve loop.
//!
//! The [`WorkerBuilder`] configures the protocol version, formatter and
//! plugin metadata. The [`Worker`] then serves exactly one host connection:
//! 1. Read a message kind
//! 2. Read the request body (payloads and, in v3, the sentinel)
//! 3. Handle it and write the response
//! 4. Repeat until the host sends `Close`
//!
//! A failed request becomes a status-1 response and the loop goes on. A
//! transport failure ends the loop with a [`StreamError`]; the stream can no
//! longer be trusted, so nothing is written.
//!
//! # Example
//!
//! ```ignore
//! use fmtwire::Worker;
//! use fmtwire::format::YapfFormatter;
//! use fmtwire::protocol::ProtocolVersion;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut worker = Worker::builder()
//!         .protocol_version(ProtocolVersion::V3)
//!         .formatter(YapfFormatter::new("python3"))
//!         .build();
//!
//!     worker.serve_stdio().await?;
//!     Ok(())
//! }
//! ```

use tokio::io::{AsyncRead, AsyncWrite};

use crate::control::{PluginInfo, LICENSE_TEXT};
use crate::error::{FmtwireError, StreamError, StreamResult};
use crate::format::{Formatter, YapfFormatter};
use crate::handler::{HandlerContext, Request, Response};
use crate::protocol::{MessageKind, ProtocolVersion, DEFAULT_MAX_PAYLOAD_SIZE};
use crate::transport::{stdio_channel, Channel};

/// Builder for configuring and creating a [`Worker`].
pub struct WorkerBuilder {
    version: ProtocolVersion,
    formatter: Option<Box<dyn Formatter>>,
    plugin_info: PluginInfo,
    license_text: String,
    max_payload_size: usize,
}

impl WorkerBuilder {
    /// Create a new worker builder.
    pub fn new() -> Self {
        Self {
            version: ProtocolVersion::default(),
            formatter: None,
            plugin_info: PluginInfo::default(),
            license_text: LICENSE_TEXT.to_string(),
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }

    /// Set the wire protocol version.
    ///
    /// Default: v3
    pub fn protocol_version(mut self, version: ProtocolVersion) -> Self {
        self.version = version;
        self
    }

    /// Set the formatting engine.
    ///
    /// Default: [`YapfFormatter`] using `python`
    pub fn formatter<F: Formatter>(mut self, formatter: F) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    /// Set the metadata returned by `GetPluginInfo`.
    pub fn plugin_info(mut self, plugin_info: PluginInfo) -> Self {
        self.plugin_info = plugin_info;
        self
    }

    /// Set the text returned by `GetLicenseText`.
    pub fn license_text(mut self, license_text: impl Into<String>) -> Self {
        self.license_text = license_text.into();
        self
    }

    /// Set the maximum inbound payload size.
    ///
    /// Default: 1 GB
    pub fn max_payload_size(mut self, max_payload_size: usize) -> Self {
        self.max_payload_size = max_payload_size;
        self
    }

    /// Build the worker.
    pub fn build(self) -> Worker {
        let formatter = self
            .formatter
            .unwrap_or_else(|| Box::new(YapfFormatter::default()));

        Worker {
            context: HandlerContext::new(
                self.version,
                formatter,
                self.plugin_info,
                self.license_text,
            ),
            version: self.version,
            max_payload_size: self.max_payload_size,
        }
    }
}

impl Default for WorkerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A worker serving one host connection.
pub struct Worker {
    context: HandlerContext,
    version: ProtocolVersion,
    max_payload_size: usize,
}

impl Worker {
    /// Create a new worker builder.
    pub fn builder() -> WorkerBuilder {
        WorkerBuilder::new()
    }

    /// Protocol version this worker speaks.
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Serve the host on this process's stdin/stdout.
    pub async fn serve_stdio(&mut self) -> StreamResult<()> {
        let mut channel = stdio_channel(self.version).with_max_payload_size(self.max_payload_size);
        self.run(&mut channel).await
    }

    /// Serve the host on an arbitrary reader/writer pair.
    pub async fn serve<R, W>(&mut self, reader: R, writer: W) -> StreamResult<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut channel =
            Channel::new(reader, writer, self.version).with_max_payload_size(self.max_payload_size);
        self.run(&mut channel).await
    }

    /// Main loop - read requests and answer them until `Close`.
    ///
    /// Returns `Ok(())` after `Close`. Any error is fatal.
    pub async fn run<R, W>(&mut self, channel: &mut Channel<R, W>) -> StreamResult<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            let kind = channel
                .try_read_u32()
                .await?
                .ok_or(StreamError::ConnectionClosed)?;

            let request = Request::read_body(kind, channel).await?;
            tracing::debug!("Received message kind {}", describe_kind(kind));

            match self.context.handle(request).await {
                Ok(Some(response)) => response.write_to(channel).await?,
                Ok(None) => {
                    tracing::info!("Received close, shutting down");
                    return Ok(());
                }
                Err(FmtwireError::Stream(e)) => return Err(e),
                Err(e) => {
                    tracing::warn!("Message kind {} failed: {}", describe_kind(kind), e);
                    let message = format!(
                        "Error handling message kind {}: {}",
                        describe_kind(kind),
                        e.diagnostic()
                    );
                    Response::Error(message).write_to(channel).await?;
                }
            }
        }
    }
}

fn describe_kind(kind: u32) -> String {
    match MessageKind::from_u32(kind) {
        Some(known) => known.to_string(),
        None => kind.to_string(),
    }
}
