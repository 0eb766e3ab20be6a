//! Stdio binding for the worker channel.
//!
//! The host talks to the worker over the worker's stdin/stdout.
//!
//! # Important
//!
//! - **stdout**: protocol bytes only
//! - **stderr**: logs (never parsed by the host)
//! - **Never use `println!`**: a single stray byte on stdout desynchronizes
//!   the host

use tokio::io::{Stdin, Stdout};

use super::Channel;
use crate::protocol::ProtocolVersion;

/// Channel bound to this process's stdin and stdout.
pub type StdioChannel = Channel<Stdin, Stdout>;

/// Create a channel over the process's stdin/stdout.
pub fn stdio_channel(version: ProtocolVersion) -> StdioChannel {
    Channel::new(tokio::io::stdin(), tokio::io::stdout(), version)
}
