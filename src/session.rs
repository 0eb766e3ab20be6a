//! Per-process configuration state.
//!
//! The host pushes a global and a plugin configuration once each; every
//! format request may add a request-scoped override. Precedence on key
//! collision is override > plugin > global.

use crate::error::Result;
use crate::format::{ConfigMap, StyleOptions};

/// Configuration pushed by the host, kept for the life of the worker.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    global: ConfigMap,
    plugin: ConfigMap,
}

impl SessionConfig {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the global configuration wholesale.
    pub fn set_global(&mut self, config: ConfigMap) {
        self.global = config;
    }

    /// Replace the plugin configuration wholesale.
    pub fn set_plugin(&mut self, config: ConfigMap) {
        self.plugin = config;
    }

    /// Current global configuration.
    pub fn global(&self) -> &ConfigMap {
        &self.global
    }

    /// Current plugin configuration.
    pub fn plugin(&self) -> &ConfigMap {
        &self.plugin
    }

    /// Merge the stored layers with `overrides` into engine options.
    pub fn resolve(&self, overrides: &ConfigMap) -> StyleOptions {
        let mut style = StyleOptions::from_config(&self.global);
        style.merge(StyleOptions::from_config(&self.plugin));
        style.merge(StyleOptions::from_config(overrides));
        style
    }
}

/// Parse a configuration payload. Must be a JSON object.
pub fn parse_config(payload: &[u8]) -> Result<ConfigMap> {
    Ok(serde_json::from_slice(payload)?)
}
