//! Response encoding.
//!
//! Every response starts with a status word. The rest depends on the request:
//!
//! | Response    | Layout                                  |
//! |-------------|-----------------------------------------|
//! | `Ack`       | `0`                                     |
//! | `Int`       | `0, value`                              |
//! | `Data`      | `0, variable(bytes)`                    |
//! | `Unchanged` | `0, 0`                                  |
//! | `Formatted` | `0, 1, variable(new text)`              |
//! | `Error`     | `1, variable(diagnostic text)`          |
//!
//! followed by the sentinel in v3, then a flush.

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::StreamResult;
use crate::protocol::status;
use crate::transport::Channel;

/// Format result flag: the text was rewritten.
pub const FILE_CHANGED: u32 = 1;

/// Format result flag: the text was already formatted.
pub const FILE_UNCHANGED: u32 = 0;

/// A response ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Bare success.
    Ack,
    /// Success with one integer.
    Int(u32),
    /// Success with one variable payload.
    Data(Bytes),
    /// Format succeeded and the text did not change.
    Unchanged,
    /// Format succeeded with new text.
    Formatted(Bytes),
    /// The request failed.
    Error(String),
}

impl Response {
    /// Status word this response starts with.
    pub fn status(&self) -> u32 {
        match self {
            Response::Error(_) => status::ERROR,
            _ => status::SUCCESS,
        }
    }

    /// Write the complete response, sentinel included, and flush.
    pub async fn write_to<R, W>(&self, channel: &mut Channel<R, W>) -> StreamResult<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        channel.write_u32(self.status()).await?;
        match self {
            Response::Ack => {}
            Response::Int(value) => channel.write_u32(*value).await?,
            Response::Data(payload) => channel.write_variable(payload).await?,
            Response::Unchanged => channel.write_u32(FILE_UNCHANGED).await?,
            Response::Formatted(text) => {
                channel.write_u32(FILE_CHANGED).await?;
                channel.write_variable(text).await?;
            }
            Response::Error(message) => channel.write_variable(message.as_bytes()).await?,
        }
        channel.write_sentinel().await?;
        channel.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ProtocolVersion;
    use std::io::Cursor;

    async fn encode(response: Response, version: ProtocolVersion) -> Vec<u8> {
        let mut channel = Channel::new(Cursor::new(Vec::new()), Vec::new(), version);
        response.write_to(&mut channel).await.unwrap();
        channel.into_inner().1
    }

    #[tokio::test]
    async fn test_ack_layout() {
        assert_eq!(
            encode(Response::Ack, ProtocolVersion::V3).await,
            vec![0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]
        );
        assert_eq!(encode(Response::Ack, ProtocolVersion::V2).await, vec![0, 0, 0, 0]);
    }

    #[tokio::test]
    async fn test_int_layout() {
        assert_eq!(
            encode(Response::Int(3), ProtocolVersion::V3).await,
            vec![0, 0, 0, 0, 0, 0, 0, 3, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[tokio::test]
    async fn test_unchanged_layout() {
        assert_eq!(
            encode(Response::Unchanged, ProtocolVersion::V2).await,
            vec![0, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[tokio::test]
    async fn test_formatted_layout() {
        let bytes = encode(Response::Formatted(Bytes::from_static(b"x = 1\n")), ProtocolVersion::V3).await;
        let mut expected = vec![0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 6];
        expected.extend_from_slice(b"x = 1\n");
        expected.extend_from_slice(&[0xFF; 4]);
        assert_eq!(bytes, expected);
    }

    #[tokio::test]
    async fn test_error_layout() {
        let bytes = encode(Response::Error("boom".to_string()), ProtocolVersion::V3).await;
        let mut expected = vec![0, 0, 0, 1, 0, 0, 0, 4];
        expected.extend_from_slice(b"boom");
        expected.extend_from_slice(&[0xFF; 4]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_status() {
        assert_eq!(Response::Ack.status(), status::SUCCESS);
        assert_eq!(Response::Unchanged.status(), status::SUCCESS);
        assert_eq!(Response::Error(String::new()).status(), status::ERROR);
    }
}
