//! Config extraction: turning a manifest-embedded config value into its own
//! source file.
//!
//! Every config domain is bound to exactly one output format and a list of
//! candidate filenames. Only JS modules can be produced.

use std::fmt;

use serde_json::Value;

use crate::domain::{entities::file_tree::FileTree, error::DomainError};

const INDENT: &str = "  ";

/// Output formats a config domain can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Js,
    Json,
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Js => write!(f, "js"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// A generated config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub filename: String,
    pub content: String,
}

/// Static rule for one config domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTransform {
    format: ConfigFormat,
    filenames: &'static [&'static str],
    /// Module exporting a `defineConfig` helper to wrap the value in.
    define_config_from: Option<&'static str>,
}

impl ConfigTransform {
    pub const fn new(format: ConfigFormat, filenames: &'static [&'static str]) -> Self {
        Self {
            format,
            filenames,
            define_config_from: None,
        }
    }

    pub const fn js(filenames: &'static [&'static str]) -> Self {
        Self::new(ConfigFormat::Js, filenames)
    }

    /// Wrap the exported value in `defineConfig(...)` required from `module`.
    pub const fn with_define_config(mut self, module: &'static str) -> Self {
        self.define_config_from = Some(module);
        self
    }

    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    /// The filename used when nothing already exists in the tree.
    pub fn default_filename(&self) -> Option<&'static str> {
        self.filenames.first().copied()
    }

    /// Render `value` as this domain's config file.
    ///
    /// With `existing`, a candidate filename already present in the tree is
    /// preferred over the default one.
    pub fn transform(
        &self,
        key: &str,
        value: &Value,
        existing: Option<&FileTree>,
    ) -> Result<ConfigFile, DomainError> {
        if self.format != ConfigFormat::Js {
            return Err(DomainError::UnsupportedConfigFormat {
                key: key.to_owned(),
                format: self.format.to_string(),
            });
        }

        let filename = existing
            .and_then(|tree| self.filenames.iter().find(|f| tree.contains(f)))
            .copied()
            .or_else(|| self.default_filename())
            .ok_or_else(|| DomainError::UnsupportedConfigFormat {
                key: key.to_owned(),
                format: self.format.to_string(),
            })?;

        let body = stringify_js(value);
        let content = match self.define_config_from {
            Some(module) => format!(
                "const {{ defineConfig }} = require('{module}')\nmodule.exports = defineConfig({body})"
            ),
            None => format!("module.exports = {body}"),
        };

        Ok(ConfigFile {
            filename: filename.to_owned(),
            content: ensure_eol(&content),
        })
    }
}

/// The default extraction table, in extraction order.
pub fn default_config_transforms() -> Vec<(&'static str, ConfigTransform)> {
    vec![
        (
            "kiln",
            ConfigTransform::js(&["kiln.config.js"]).with_define_config("@kiln/cli-service"),
        ),
        ("babel", ConfigTransform::js(&["babel.config.js"])),
        ("postcss", ConfigTransform::js(&["postcss.config.js"])),
        ("eslintConfig", ConfigTransform::js(&[".eslintrc.js"])),
        ("jest", ConfigTransform::js(&["jest.config.js"])),
        ("lint-staged", ConfigTransform::js(&["lint-staged.config.js"])),
    ]
}

/// Exactly one trailing newline.
pub fn ensure_eol(s: &str) -> String {
    let mut out = s.trim_end_matches(['\n', '\r']).to_owned();
    out.push('\n');
    out
}

/// Serialize a JSON value as a JavaScript expression.
///
/// Two-space indentation, unquoted keys where they are valid identifiers,
/// single-quoted strings.
pub fn stringify_js(value: &Value) -> String {
    let mut out = String::new();
    write_js(value, 0, &mut out);
    out
}

fn write_js(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_js_string(s, out),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                push_indent(depth + 1, out);
                write_js(item, depth + 1, out);
                if i + 1 < items.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            push_indent(depth, out);
            out.push(']');
        }
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                push_indent(depth + 1, out);
                if is_identifier(key) {
                    out.push_str(key);
                } else {
                    write_js_string(key, out);
                }
                out.push_str(": ");
                write_js(item, depth + 1, out);
                if i + 1 < map.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            push_indent(depth, out);
            out.push('}');
        }
    }
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_js_string(s: &str, out: &mut String) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\x{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
}

const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "export", "extends", "finally", "for", "function", "if", "import", "in", "instanceof",
    "new", "return", "super", "switch", "this", "throw", "try", "typeof", "var", "void", "while",
    "with", "yield", "null", "true", "false",
];

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !RESERVED_WORDS.contains(&key)
}
