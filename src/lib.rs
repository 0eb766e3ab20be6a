//! # fmtwire
//!
//! Long-lived formatting worker for a host that talks to it over stdin/stdout.
//!
//! The host sends one request at a time; the worker answers each before
//! reading the next. Requests push configuration, query plugin metadata, or
//! ask for a file to be formatted. The formatting itself is delegated to a
//! [`format::Formatter`] (yapf by default).
//!
//! ## Architecture
//!
//! - **Protocol**: big-endian u32 fields, pull-paced 1024-byte chunked
//!   payloads, and (v3) a `0xFFFFFFFF` resync sentinel after every message
//! - **Transport**: a [`transport::Channel`] over a reader/writer pair
//! - **Handlers**: per-kind request handling against a session
//! - **Worker**: the serve loop turning request failures into error
//!   responses and stream failures into a fatal exit
//!
//! ## Example
//!
//! ```ignore
//! use fmtwire::Worker;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut worker = Worker::builder().build();
//!     worker.serve_stdio().await.unwrap();
//! }
//! ```

pub mod control;
pub mod error;
pub mod format;
pub mod handler;
pub mod parent;
pub mod protocol;
pub mod session;
pub mod transport;

mod worker;

pub use error::{FmtwireError, StreamError};
pub use worker::{Worker, WorkerBuilder};
