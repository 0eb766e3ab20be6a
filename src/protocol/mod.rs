//! Protocol module - wire format, byte primitives, chunked transfer and resync.
//!
//! This module implements the worker's binary protocol:
//! - Big-endian u32 fields and exact-length byte I/O
//! - Pull-paced chunked transfer of variable payloads
//! - The v3 resync sentinel

mod chunked;
mod primitives;
mod sentinel;
mod wire_format;

pub use chunked::{read_variable, write_variable};
pub use primitives::{read_u32, strict_read, strict_write, try_read_u32, write_u32};
pub use sentinel::{expect_sentinel, write_sentinel};
pub use wire_format::{
    status, MessageKind, ProtocolVersion, CHUNK_SIZE, DEFAULT_MAX_PAYLOAD_SIZE, READY_SIGNAL,
    RESYNC_SENTINEL, U32_SIZE,
};
