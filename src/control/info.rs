//! Plugin metadata served by `GetPluginInfo` and `GetLicenseText`.
//!
//! # Example
//!
//! ```
//! use fmtwire::control::PluginInfo;
//!
//! let info = PluginInfo::default();
//! let json = info.to_json().unwrap();
//! assert!(json.contains("\"configKey\":\"yapf\""));
//! ```

use serde::Serialize;

/// License text reported to the host: the engine's license, then the plugin's.
pub const LICENSE_TEXT: &str = concat!(
    "yapf: Apache License 2.0\n\n",
    include_str!("../../LICENSE")
);

/// Plugin name reported to the host.
pub const PLUGIN_NAME: &str = "dprint-plugin-yapf";

/// Key of this plugin's section in the host's configuration file.
pub const CONFIG_KEY: &str = "yapf";

/// Description of this plugin, serialized as the `GetPluginInfo` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInfo {
    /// Plugin name.
    pub name: String,
    /// Plugin version.
    pub version: String,
    /// Configuration section key.
    pub config_key: String,
    /// File extensions this plugin formats, without the dot.
    pub file_extensions: Vec<String>,
    /// Documentation URL.
    pub help_url: String,
    /// JSON schema URL for the configuration section (may be empty).
    pub config_schema_url: String,
    /// URL the host checks for newer releases.
    pub update_url: String,
}

impl PluginInfo {
    /// Serialize to the JSON text sent on the wire.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Default for PluginInfo {
    fn default() -> Self {
        Self {
            name: PLUGIN_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            config_key: CONFIG_KEY.to_string(),
            file_extensions: vec!["py".to_string()],
            help_url: "https://dprint.dev/plugins/yapf".to_string(),
            config_schema_url: String::new(),
            update_url: "https://plugins.dprint.dev/dprint/dprint-plugin-yapf/latest.json"
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_info_json_fields() {
        let json = PluginInfo::default().to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["name"], "dprint-plugin-yapf");
        assert_eq!(parsed["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(parsed["configKey"], "yapf");
        assert_eq!(parsed["fileExtensions"], serde_json::json!(["py"]));
        assert_eq!(parsed["helpUrl"], "https://dprint.dev/plugins/yapf");
        assert_eq!(parsed["configSchemaUrl"], "");
        assert_eq!(
            parsed["updateUrl"],
            "https://plugins.dprint.dev/dprint/dprint-plugin-yapf/latest.json"
        );
    }

    #[test]
    fn test_plugin_info_has_exactly_seven_fields() {
        let json = PluginInfo::default().to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_object().unwrap().len(), 7);
    }

    #[test]
    fn test_license_text() {
        assert!(LICENSE_TEXT.starts_with("yapf: Apache License 2.0\n\nThe MIT License (MIT)"));
        assert!(LICENSE_TEXT.contains("Permission is hereby granted"));
    }
}
