//! Style options handed to the formatting engine.
//!
//! Host configuration uses the dprint vocabulary (`lineWidth`, `indentWidth`,
//! `useTabs`, ...). The engine expects its own names, so each configuration
//! layer is translated before the layers are merged.

use std::fmt;

use serde_json::{Map, Value};

/// A configuration mapping as sent by the host.
pub type ConfigMap = Map<String, Value>;

/// Resolved engine options, in engine vocabulary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOptions {
    options: Map<String, Value>,
}

impl StyleOptions {
    /// Create an empty set of options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a host configuration mapping into engine options.
    ///
    /// - `lineWidth` → `column_limit`, `indentWidth` → `indent_width`,
    ///   `useTabs` → `use_tabs`; each skipped when `null`
    /// - `newLineKind` has no engine counterpart and is dropped
    /// - every other key is lower-cased, value unchanged
    pub fn from_config(config: &ConfigMap) -> Self {
        let mut options = Map::new();
        for (key, value) in config {
            let target = match key.as_str() {
                "lineWidth" => "column_limit",
                "indentWidth" => "indent_width",
                "useTabs" => "use_tabs",
                "newLineKind" => continue,
                other => {
                    options.insert(other.to_lowercase(), value.clone());
                    continue;
                }
            };
            if !value.is_null() {
                options.insert(target.to_string(), value.clone());
            }
        }
        Self { options }
    }

    /// Overlay `other` on top of `self`; `other` wins on key collision.
    pub fn merge(&mut self, other: StyleOptions) {
        self.options.extend(other.options);
    }

    /// Look up an option by engine name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether no options are set.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Render as the engine's inline style string, e.g.
    /// `{column_limit: 100, use_tabs: True}`.
    pub fn to_style_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StyleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.options.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: ", key)?;
            match value {
                Value::String(s) => f.write_str(s)?,
                other => write_literal(f, other)?,
            }
        }
        f.write_str("}")
    }
}

/// Write `value` as a Python literal. Nested strings are quoted, as `str()`
/// of a list or dict would print them.
fn write_literal(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("None"),
        Value::Bool(true) => f.write_str("True"),
        Value::Bool(false) => f.write_str("False"),
        Value::Number(n) => write!(f, "{}", n),
        Value::String(s) => write_quoted(f, s),
        Value::Array(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_literal(f, item)?;
            }
            f.write_str("]")
        }
        Value::Object(map) => {
            f.write_str("{")?;
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_quoted(f, key)?;
                f.write_str(": ")?;
                write_literal(f, item)?;
            }
            f.write_str("}")
        }
    }
}

/// Single quotes unless the text holds a single quote and no double quote.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    write!(f, "{}", quote)?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{}", c)?,
            c => write!(f, "{}", c)?,
        }
    }
    write!(f, "{}", quote)
}
