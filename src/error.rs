//! Error types for fmtwire.
//!
//! Errors are split along the line the protocol draws between the two failure
//! classes:
//!
//! - [`StreamError`] - the byte stream can no longer be trusted (short
//!   read/write, sentinel mismatch). Fatal: the worker must exit.
//! - Everything else in [`FmtwireError`] - a single request failed. The
//!   dispatcher reports it to the host as a status-1 response and keeps
//!   serving.

use std::string::FromUtf8Error;

use thiserror::Error;

use crate::format::FormatError;

/// Fatal transport-level errors.
#[derive(Debug, Error)]
pub enum StreamError {
    /// I/O error on stdin/stdout or the underlying pipe.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a fixed-size field was fully read.
    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    /// The stream stopped accepting bytes before a buffer was fully written.
    #[error("Short write: expected {expected} bytes, wrote {actual}")]
    ShortWrite { expected: usize, actual: usize },

    /// The resync sentinel was expected but other bytes were found.
    #[error("Resync sentinel not found: expected 0xffffffff, found 0x{0:08x}")]
    SentinelMismatch(u32),

    /// An inbound variable payload announced a length above the limit.
    #[error("Payload size {size} exceeds maximum {max}")]
    PayloadTooLarge { size: usize, max: usize },

    /// The host closed the inbound stream between messages.
    #[error("Connection closed")]
    ConnectionClosed,
}

/// Main error type for all fmtwire operations.
#[derive(Debug, Error)]
pub enum FmtwireError {
    /// Transport failure. Always fatal.
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// A configuration payload was not a JSON object.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A text payload was not valid UTF-8.
    #[error("Invalid UTF-8 in {field}")]
    InvalidUtf8 {
        field: &'static str,
        #[source]
        source: FromUtf8Error,
    },

    /// The host sent a message kind this worker does not know.
    #[error("Unexpected message kind: {0}")]
    UnknownMessageKind(u32),

    /// The formatting engine failed.
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
}

impl FmtwireError {
    /// Whether this error leaves the stream in an unknown state.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, FmtwireError::Stream(_))
    }

    /// Render this error and its full source chain for an error response.
    pub fn diagnostic(&self) -> String {
        let mut text = self.to_string();
        let mut source = std::error::Error::source(self);
        if source.is_some() {
            text.push_str("\n\nCaused by:");
        }
        while let Some(cause) = source {
            text.push_str("\n    ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        text
    }
}

/// Result type alias using FmtwireError.
pub type Result<T> = std::result::Result<T, FmtwireError>;

/// Result type alias for transport-level operations.
pub type StreamResult<T> = std::result::Result<T, StreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_errors_are_fatal() {
        let err = FmtwireError::from(StreamError::SentinelMismatch(0));
        assert!(err.is_fatal());

        let err = FmtwireError::from(StreamError::ConnectionClosed);
        assert!(err.is_fatal());
    }

    #[test]
    fn test_request_errors_are_recoverable() {
        assert!(!FmtwireError::UnknownMessageKind(42).is_fatal());

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!FmtwireError::from(json).is_fatal());
    }

    #[test]
    fn test_diagnostic_includes_source_chain() {
        let source = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err = FmtwireError::InvalidUtf8 {
            field: "file text",
            source,
        };

        let text = err.diagnostic();
        assert!(text.starts_with("Invalid UTF-8 in file text"));
        assert!(text.contains("Caused by:"));
        assert!(text.contains("invalid utf-8"));
    }

    #[test]
    fn test_diagnostic_without_source() {
        let text = FmtwireError::UnknownMessageKind(99).diagnostic();
        assert_eq!(text, "Unexpected message kind: 99");
    }

    #[test]
    fn test_sentinel_mismatch_message() {
        let err = StreamError::SentinelMismatch(0xdead_beef);
        assert_eq!(
            err.to_string(),
            "Resync sentinel not found: expected 0xffffffff, found 0xdeadbeef"
        );
    }
}
