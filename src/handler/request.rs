//! Request decoding.
//!
//! A request is a message kind followed by a kind-specific list of variable
//! payloads and, in v3, the host's sentinel. [`Request::read_body`] consumes
//! all of it before anything is decoded, so a malformed payload never leaves
//! unread bytes behind.

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::StreamResult;
use crate::protocol::MessageKind;
use crate::transport::Channel;

/// A fully received request. Payloads are still raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    GetSchemaVersion,
    GetPluginInfo,
    GetLicenseText,
    GetResolvedConfig,
    SetGlobalConfig(Bytes),
    SetPluginConfig(Bytes),
    GetConfigDiagnostics,
    Format {
        path: Bytes,
        text: Bytes,
        override_config: Bytes,
    },
    Close,
    /// A kind this worker does not know. Treated as payload-less.
    Unknown(u32),
}

impl Request {
    /// Read the rest of a request whose kind was already read.
    pub async fn read_body<R, W>(kind: u32, channel: &mut Channel<R, W>) -> StreamResult<Self>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let known = MessageKind::from_u32(kind);
        let count = known.map_or(0, MessageKind::payload_count);
        let mut payloads = Vec::with_capacity(count);
        for _ in 0..count {
            payloads.push(channel.read_variable().await?);
        }
        channel.read_sentinel().await?;

        let mut payloads = payloads.into_iter();
        let mut next = move || payloads.next().unwrap_or_default();
        let request = match known {
            Some(MessageKind::GetSchemaVersion) => Request::GetSchemaVersion,
            Some(MessageKind::GetPluginInfo) => Request::GetPluginInfo,
            Some(MessageKind::GetLicenseText) => Request::GetLicenseText,
            Some(MessageKind::GetResolvedConfig) => Request::GetResolvedConfig,
            Some(MessageKind::SetGlobalConfig) => Request::SetGlobalConfig(next()),
            Some(MessageKind::SetPluginConfig) => Request::SetPluginConfig(next()),
            Some(MessageKind::GetConfigDiagnostics) => Request::GetConfigDiagnostics,
            Some(MessageKind::Format) => Request::Format {
                path: next(),
                text: next(),
                override_config: next(),
            },
            Some(MessageKind::Close) => Request::Close,
            None => Request::Unknown(kind),
        };
        Ok(request)
    }

    /// Send this request, as a host would.
    pub async fn write_to<R, W>(&self, channel: &mut Channel<R, W>) -> StreamResult<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        channel.write_u32(self.wire_kind()).await?;
        match self {
            Request::SetGlobalConfig(config) | Request::SetPluginConfig(config) => {
                channel.write_variable(config).await?;
            }
            Request::Format {
                path,
                text,
                override_config,
            } => {
                channel.write_variable(path).await?;
                channel.write_variable(text).await?;
                channel.write_variable(override_config).await?;
            }
            _ => {}
        }
        channel.write_sentinel().await?;
        channel.flush().await
    }

    /// The known kind of this request, if any.
    pub fn kind(&self) -> Option<MessageKind> {
        let kind = match self {
            Request::GetSchemaVersion => MessageKind::GetSchemaVersion,
            Request::GetPluginInfo => MessageKind::GetPluginInfo,
            Request::GetLicenseText => MessageKind::GetLicenseText,
            Request::GetResolvedConfig => MessageKind::GetResolvedConfig,
            Request::SetGlobalConfig(_) => MessageKind::SetGlobalConfig,
            Request::SetPluginConfig(_) => MessageKind::SetPluginConfig,
            Request::GetConfigDiagnostics => MessageKind::GetConfigDiagnostics,
            Request::Format { .. } => MessageKind::Format,
            Request::Close => MessageKind::Close,
            Request::Unknown(_) => return None,
        };
        Some(kind)
    }

    /// The message kind value as it appears on the wire.
    pub fn wire_kind(&self) -> u32 {
        match self {
            Request::Unknown(kind) => *kind,
            other => other.kind().map(MessageKind::as_u32).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StreamError;
    use crate::protocol::ProtocolVersion;
    use std::io::Cursor;

    fn variable(payload: &[u8]) -> Vec<u8> {
        let mut out = (payload.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(payload);
        out
    }

    fn channel(wire: Vec<u8>, version: ProtocolVersion) -> Channel<Cursor<Vec<u8>>, Vec<u8>> {
        Channel::new(Cursor::new(wire), Vec::new(), version)
    }

    #[tokio::test]
    async fn test_read_payloadless_request_v3() {
        let mut channel = channel(vec![0xFF; 4], ProtocolVersion::V3);
        let request = Request::read_body(1, &mut channel).await.unwrap();
        assert_eq!(request, Request::GetPluginInfo);
    }

    #[tokio::test]
    async fn test_read_payloadless_request_v2() {
        let mut channel = channel(Vec::new(), ProtocolVersion::V2);
        let request = Request::read_body(0, &mut channel).await.unwrap();
        assert_eq!(request, Request::GetSchemaVersion);
    }

    #[tokio::test]
    async fn test_read_format_request() {
        let mut wire = Vec::new();
        wire.extend(variable(b"src/main.py"));
        wire.extend(variable(b"x=1\n"));
        wire.extend(variable(b"{}"));
        wire.extend([0xFF; 4]);

        let mut channel = channel(wire, ProtocolVersion::V3);
        let request = Request::read_body(7, &mut channel).await.unwrap();
        assert_eq!(
            request,
            Request::Format {
                path: Bytes::from_static(b"src/main.py"),
                text: Bytes::from_static(b"x=1\n"),
                override_config: Bytes::from_static(b"{}"),
            }
        );
    }

    #[tokio::test]
    async fn test_read_set_config_request() {
        let mut wire = variable(br#"{"lineWidth":80}"#);
        wire.extend([0xFF; 4]);

        let mut channel = channel(wire, ProtocolVersion::V3);
        let request = Request::read_body(4, &mut channel).await.unwrap();
        assert_eq!(
            request,
            Request::SetGlobalConfig(Bytes::from_static(br#"{"lineWidth":80}"#))
        );
    }

    #[tokio::test]
    async fn test_unknown_kind_consumes_sentinel() {
        let mut channel = channel(vec![0xFF; 4], ProtocolVersion::V3);
        let request = Request::read_body(42, &mut channel).await.unwrap();
        assert_eq!(request, Request::Unknown(42));
        assert_eq!(request.kind(), None);
        assert_eq!(request.wire_kind(), 42);
    }

    #[tokio::test]
    async fn test_missing_sentinel_after_payload_is_fatal() {
        let mut wire = variable(b"{}");
        wire.extend([0, 0, 0, 0]);

        let mut channel = channel(wire, ProtocolVersion::V3);
        let err = Request::read_body(5, &mut channel).await.unwrap_err();
        assert!(matches!(err, StreamError::SentinelMismatch(0)));
    }

    #[tokio::test]
    async fn test_write_to_layout() {
        let request = Request::SetPluginConfig(Bytes::from_static(b"{}"));
        let mut channel = channel(Vec::new(), ProtocolVersion::V3);
        request.write_to(&mut channel).await.unwrap();

        let (_, written) = channel.into_inner();
        let mut expected = 5u32.to_be_bytes().to_vec();
        expected.extend(variable(b"{}"));
        expected.extend([0xFF; 4]);
        assert_eq!(written, expected);
    }

    #[tokio::test]
    async fn test_payloads_follow_kind_counts() {
        let requests = [
            Request::GetConfigDiagnostics,
            Request::SetGlobalConfig(Bytes::from_static(b"{}")),
            Request::Format {
                path: Bytes::from_static(b"a.py"),
                text: Bytes::from_static(b"x\n"),
                override_config: Bytes::from_static(b"{}"),
            },
        ];
        for request in requests {
            let mut sent = channel(Vec::new(), ProtocolVersion::V3);
            request.write_to(&mut sent).await.unwrap();
            let (_, wire) = sent.into_inner();

            let mut received = channel(wire[4..].to_vec(), ProtocolVersion::V3);
            let decoded = Request::read_body(request.wire_kind(), &mut received)
                .await
                .unwrap();
            assert_eq!(decoded, request);

            let (rest, _) = received.into_inner();
            assert_eq!(rest.position() as usize, rest.get_ref().len());
        }
    }

    #[test]
    fn test_wire_kind() {
        assert_eq!(Request::Close.wire_kind(), 8);
        assert_eq!(Request::GetSchemaVersion.wire_kind(), 0);
        assert_eq!(Request::Unknown(99).wire_kind(), 99);
    }
}
