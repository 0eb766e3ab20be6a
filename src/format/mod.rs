//! Format module - the boundary to the text-formatting engine.
//!
//! The worker never formats text itself. It resolves [`StyleOptions`] and
//! hands the text to a [`Formatter`]:
//!
//! - [`YapfFormatter`] - runs the yapf engine as a child process
//! - [`FnFormatter`] - wraps a plain function (embedding, tests)
//!
//! # Example
//!
//! ```
//! use fmtwire::format::{FnFormatter, FormatRequest};
//!
//! let upper = FnFormatter::new(|request: FormatRequest| Ok(request.text.to_uppercase()));
//! ```

mod style;
mod yapf;

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::ExitStatus;
use std::string::FromUtf8Error;

use thiserror::Error;

pub use style::{ConfigMap, StyleOptions};
pub use yapf::YapfFormatter;

/// Boxed future returned by formatters.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors raised by a formatting engine.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The engine process could not be started or talked to.
    #[error("failed to run formatter: {0}")]
    Spawn(#[from] std::io::Error),

    /// The engine exited unsuccessfully.
    #[error("formatter exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },

    /// The engine produced output that is not UTF-8.
    #[error("formatter produced invalid UTF-8")]
    InvalidOutput(#[source] FromUtf8Error),

    /// The engine rejected the input.
    #[error("{0}")]
    Engine(String),
}

/// Everything an engine needs to format one file.
#[derive(Debug, Clone)]
pub struct FormatRequest {
    /// Path of the file being formatted, as given by the host.
    pub path: PathBuf,
    /// Current file contents.
    pub text: String,
    /// Resolved engine options.
    pub style: StyleOptions,
}

/// A text-formatting engine.
pub trait Formatter: Send + Sync + 'static {
    /// Format `request.text`, returning the full new text.
    ///
    /// Returning the input unchanged means "already formatted".
    fn format(&self, request: FormatRequest) -> BoxFuture<'static, Result<String, FormatError>>;
}

/// Formatter backed by a synchronous function.
pub struct FnFormatter<F> {
    func: F,
}

impl<F> FnFormatter<F>
where
    F: Fn(FormatRequest) -> Result<String, FormatError> + Send + Sync + 'static,
{
    /// Wrap `func` as a formatter.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Formatter for FnFormatter<F>
where
    F: Fn(FormatRequest) -> Result<String, FormatError> + Send + Sync + 'static,
{
    fn format(&self, request: FormatRequest) -> BoxFuture<'static, Result<String, FormatError>> {
        let result = (self.func)(request);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str) -> FormatRequest {
        FormatRequest {
            path: PathBuf::from("main.py"),
            text: text.to_string(),
            style: StyleOptions::new(),
        }
    }

    #[tokio::test]
    async fn test_fn_formatter_ok() {
        let formatter = FnFormatter::new(|req: FormatRequest| Ok(req.text.trim_end().to_string() + "\n"));
        let out = formatter.format(request("x = 1   \n\n")).await.unwrap();
        assert_eq!(out, "x = 1\n");
    }

    #[tokio::test]
    async fn test_fn_formatter_error() {
        let formatter = FnFormatter::new(|_req: FormatRequest| Err(FormatError::Engine("bad input".into())));
        let err = formatter.format(request("(")).await.unwrap_err();
        assert_eq!(err.to_string(), "bad input");
    }

    #[test]
    fn test_formatter_is_object_safe() {
        let formatter: Box<dyn Formatter> = Box::new(FnFormatter::new(|req: FormatRequest| Ok(req.text)));
        let _ = formatter;
    }
}
