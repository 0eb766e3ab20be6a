//! Transport module - the byte-stream pair a worker serves.
//!
//! Provides:
//! - [`Channel`] - versioned reader/writer pair with the protocol operations
//! - [`stdio_channel`] - the channel over this process's stdin/stdout

mod channel;
mod stdio;

pub use channel::Channel;
pub use stdio::{stdio_channel, StdioChannel};
