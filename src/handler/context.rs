//! Handler context - the state request handlers run against.
//!
//! [`HandlerContext`] owns everything that outlives a single request: the
//! session configuration, the formatter and the static plugin metadata. The
//! worker loop owns the context, so handlers get exclusive access without
//! locking.
//!
//! Handlers return `Result<Option<Response>>`:
//! - `Ok(Some(response))` - write it
//! - `Ok(None)` - the host asked to close; write nothing
//! - `Err(e)` - the request failed; the worker ends the connection on
//!   [`FmtwireError::Stream`] and answers with an error response otherwise

use std::path::PathBuf;

use bytes::Bytes;

use super::{Request, Response};
use crate::control::PluginInfo;
use crate::error::{FmtwireError, Result};
use crate::format::{FormatRequest, Formatter};
use crate::protocol::ProtocolVersion;
use crate::session::{parse_config, SessionConfig};

/// Placeholder body for `GetResolvedConfig`.
pub const RESOLVED_CONFIG_PLACEHOLDER: &str = "{}";

/// Placeholder body for `GetConfigDiagnostics`.
pub const CONFIG_DIAGNOSTICS_PLACEHOLDER: &str = "[]";

/// State shared by all requests on one connection.
pub struct HandlerContext {
    version: ProtocolVersion,
    session: SessionConfig,
    formatter: Box<dyn Formatter>,
    plugin_info: PluginInfo,
    license_text: String,
}

impl HandlerContext {
    /// Create a context with an empty session.
    pub fn new(
        version: ProtocolVersion,
        formatter: Box<dyn Formatter>,
        plugin_info: PluginInfo,
        license_text: String,
    ) -> Self {
        Self {
            version,
            session: SessionConfig::new(),
            formatter,
            plugin_info,
            license_text,
        }
    }

    /// Session configuration received so far.
    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    /// Handle one fully received request.
    pub async fn handle(&mut self, request: Request) -> Result<Option<Response>> {
        let response = match request {
            Request::GetSchemaVersion => Response::Int(self.version.as_u32()),
            Request::GetPluginInfo => Response::Data(Bytes::from(self.plugin_info.to_json()?)),
            Request::GetLicenseText => Response::Data(Bytes::from(self.license_text.clone())),
            Request::GetResolvedConfig => {
                Response::Data(Bytes::from_static(RESOLVED_CONFIG_PLACEHOLDER.as_bytes()))
            }
            Request::SetGlobalConfig(payload) => {
                self.session.set_global(parse_config(&payload)?);
                Response::Ack
            }
            Request::SetPluginConfig(payload) => {
                self.session.set_plugin(parse_config(&payload)?);
                Response::Ack
            }
            Request::GetConfigDiagnostics => {
                Response::Data(Bytes::from_static(CONFIG_DIAGNOSTICS_PLACEHOLDER.as_bytes()))
            }
            Request::Format {
                path,
                text,
                override_config,
            } => self.format(path, text, override_config).await?,
            Request::Close => return Ok(None),
            Request::Unknown(kind) => return Err(FmtwireError::UnknownMessageKind(kind)),
        };
        Ok(Some(response))
    }

    async fn format(&self, path: Bytes, text: Bytes, override_config: Bytes) -> Result<Response> {
        let path = decode_utf8("file path", path)?;
        let text = decode_utf8("file text", text)?;
        let overrides = parse_config(&override_config)?;

        let request = FormatRequest {
            path: PathBuf::from(path),
            text: text.clone(),
            style: self.session.resolve(&overrides),
        };
        let formatted = self.formatter.format(request).await?;

        if formatted == text {
            Ok(Response::Unchanged)
        } else {
            Ok(Response::Formatted(Bytes::from(formatted)))
        }
    }
}

fn decode_utf8(field: &'static str, bytes: Bytes) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|source| FmtwireError::InvalidUtf8 { field, source })
}
