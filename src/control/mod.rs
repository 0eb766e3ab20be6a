//! Control module - static plugin metadata.
//!
//! The control messages (`GetPluginInfo`, `GetLicenseText`) answer with data
//! that never changes during a worker's life. It lives here so hosts embedding
//! the library can override it through the worker builder.

mod info;

pub use info::{PluginInfo, CONFIG_KEY, LICENSE_TEXT, PLUGIN_NAME};
