//! The generated project's `package.json`, held as an ordered JSON object.

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::error::DomainError;

/// Top-level keys that lead the serialized manifest, in this order.
pub const MANIFEST_KEY_ORDER: &[&str] = &[
    "name",
    "version",
    "private",
    "description",
    "author",
    "scripts",
    "main",
    "module",
    "browser",
    "jsDelivr",
    "unpkg",
    "files",
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "kiln",
    "babel",
    "eslintConfig",
    "prettier",
    "postcss",
    "browserslist",
    "jest",
];

/// Scripts that lead the `scripts` mapping, in this order.
pub const SCRIPT_ORDER: &[&str] = &["serve", "build", "test:unit", "test:e2e", "lint", "deploy"];

const DEPENDENCY_KEYS: &[&str] = &["dependencies", "devDependencies", "peerDependencies"];

/// Mutable project manifest.
///
/// Values set by one plugin can only be changed by a later overwrite; there
/// is no delete through the plugin API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    fields: Map<String, Value>,
}

impl Manifest {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build from an arbitrary JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(DomainError::InvalidManifest(format!(
                "expected an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Deep-merge `incoming` into the manifest.
    ///
    /// Per top-level key: when both sides are objects they are combined with
    /// [`merge_deps`]; otherwise the incoming value replaces the existing
    /// one. Arrays are replaced, never concatenated.
    pub fn extend(&mut self, incoming: &Map<String, Value>) {
        for (key, value) in incoming {
            let merged = match (self.fields.get(key), value) {
                (Some(Value::Object(existing)), Value::Object(patch)) => {
                    Value::Object(merge_deps(existing, patch))
                }
                _ => value.clone(),
            };
            self.fields.insert(key.clone(), merged);
        }
    }

    /// [`Manifest::extend`] for a value that must be an object.
    pub fn extend_with_value(&mut self, incoming: &Value) -> Result<(), DomainError> {
        match incoming {
            Value::Object(map) => {
                self.extend(map);
                Ok(())
            }
            other => Err(DomainError::InvalidManifest(format!(
                "manifest fragment must be an object, got {}",
                json_kind(other)
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Remove a key. Used by config extraction only.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Apply the canonical ordering.
    ///
    /// Dependency mappings are sorted lexicographically, `scripts` follows
    /// [`SCRIPT_ORDER`] and the top level follows [`MANIFEST_KEY_ORDER`];
    /// keys not named in an order list follow, lexicographically.
    pub fn sort(&mut self) {
        for key in DEPENDENCY_KEYS {
            if let Some(Value::Object(deps)) = self.fields.get_mut(*key) {
                *deps = sort_object(std::mem::take(deps), &[]);
            }
        }
        if let Some(Value::Object(scripts)) = self.fields.get_mut("scripts") {
            *scripts = sort_object(std::mem::take(scripts), SCRIPT_ORDER);
        }
        self.fields = sort_object(std::mem::take(&mut self.fields), MANIFEST_KEY_ORDER);
    }

    /// Serialize as `package.json` text: two-space indent, one trailing newline.
    pub fn to_json_string(&self) -> Result<String, DomainError> {
        let mut out = serde_json::to_string_pretty(&self.fields)
            .map_err(|e| DomainError::InvalidManifest(format!("cannot serialize manifest: {e}")))?;
        out.push('\n');
        Ok(out)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Shallow last-writer-wins merge of two mappings (dependency semantics).
///
/// Every incoming key whose value is absent or different in `existing`
/// overwrites it; identical values are left alone. No range intersection.
pub fn merge_deps(existing: &Map<String, Value>, incoming: &Map<String, Value>) -> Map<String, Value> {
    let mut result = existing.clone();
    for (name, range) in incoming {
        match existing.get(name) {
            Some(current) if current == range => continue,
            Some(current) => {
                debug!(key = %name, from = %current, to = %range, "manifest value replaced");
            }
            None => {}
        }
        result.insert(name.clone(), range.clone());
    }
    result
}

/// Reorder an object: `key_order` entries first (when present), then the
/// remaining keys sorted lexicographically.
pub fn sort_object(mut obj: Map<String, Value>, key_order: &[&str]) -> Map<String, Value> {
    let mut sorted = Map::new();
    for key in key_order {
        if let Some(value) = obj.shift_remove(*key) {
            sorted.insert((*key).to_owned(), value);
        }
    }

    let mut rest: Vec<(String, Value)> = obj.into_iter().collect();
    rest.sort_by(|a, b| a.0.cmp(&b.0));
    sorted.extend(rest);
    sorted
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
