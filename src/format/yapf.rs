//! yapf engine adapter.
//!
//! Runs yapf's `FormatCode` API in a child interpreter per request. The file
//! text goes in on stdin and the formatted text comes back on stdout, both as
//! raw UTF-8 so line endings and trailing whitespace reach the engine as sent.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{BoxFuture, FormatError, FormatRequest, Formatter};

/// Default interpreter used to run yapf.
pub const DEFAULT_PYTHON: &str = "python";

/// Program run with `-c`; the style string is its first argument.
pub const FORMAT_SCRIPT: &str = "\
import sys
from yapf.yapflib.yapf_api import FormatCode
text = sys.stdin.buffer.read().decode('utf-8')
formatted, _ = FormatCode(text, style_config=sys.argv[1])
sys.stdout.buffer.write(formatted.encode('utf-8'))
sys.stdout.buffer.flush()
";

/// Formatter that shells out to yapf.
#[derive(Debug, Clone)]
pub struct YapfFormatter {
    python: String,
}

impl YapfFormatter {
    /// Use the given Python interpreter.
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }

    /// Interpreter this formatter runs.
    pub fn python(&self) -> &str {
        &self.python
    }

    /// Build the engine command for `request`.
    fn command(&self, request: &FormatRequest) -> Command {
        let mut command = Command::new(&self.python);
        command
            .arg("-c")
            .arg(FORMAT_SCRIPT)
            .arg(request.style.to_style_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

impl Default for YapfFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_PYTHON)
    }
}

impl Formatter for YapfFormatter {
    fn format(&self, request: FormatRequest) -> BoxFuture<'static, Result<String, FormatError>> {
        let mut command = self.command(&request);
        Box::pin(async move {
            tracing::debug!(
                "Running yapf on {} with style {}",
                request.path.display(),
                request.style
            );

            let mut child = command.spawn()?;
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| FormatError::Engine("formatter stdin unavailable".to_string()))?;

            let text = request.text.into_bytes();
            let feed = async move {
                stdin.write_all(&text).await?;
                stdin.shutdown().await
            };

            let (fed, output) = tokio::join!(feed, child.wait_with_output());
            let output = output?;

            // A failing engine may close stdin early; its exit status says more.
            if !output.status.success() {
                return Err(FormatError::Failed {
                    status: output.status,
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                });
            }
            fed?;

            String::from_utf8(output.stdout).map_err(FormatError::InvalidOutput)
        })
    }
}
