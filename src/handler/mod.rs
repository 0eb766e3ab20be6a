//! Handler module - request decoding, handling and response encoding.
//!
//! Provides:
//! - [`Request`] - a fully received request (raw payloads, sentinel consumed)
//! - [`Response`] - a response ready to be written
//! - [`HandlerContext`] - session state and the per-kind handlers
//!
//! # Example
//!
//! ```ignore
//! use fmtwire::handler::{HandlerContext, Request};
//!
//! let kind = channel.read_u32().await?;
//! let request = Request::read_body(kind, &mut channel).await?;
//! if let Some(response) = ctx.handle(request).await? {
//!     response.write_to(&mut channel).await?;
//! }
//! ```

mod context;
mod request;
mod response;

pub use context::{HandlerContext, CONFIG_DIAGNOSTICS_PLACEHOLDER, RESOLVED_CONFIG_PLACEHOLDER};
pub use request::Request;
pub use response::{Response, FILE_CHANGED, FILE_UNCHANGED};
