use std::collections::HashSet;

use serde_json::Value;

use crate::domain::{
    entities::{manifest::Manifest, preset::Preset},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_preset(preset: &Preset) -> Result<(), DomainError> {
        preset.validate()
    }

    /// Plugin ids handed to the generator must be unique.
    pub fn validate_plugin_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                return Err(DomainError::DuplicatePlugin { id: id.to_owned() });
            }
        }
        Ok(())
    }

    /// The base manifest needs a string `name`; `version` must be a string
    /// when present.
    pub fn validate_base_manifest(manifest: &Manifest) -> Result<(), DomainError> {
        match manifest.get("name") {
            Some(Value::String(name)) if !name.trim().is_empty() => {}
            _ => {
                return Err(DomainError::InvalidManifest(
                    "base manifest needs a non-empty string 'name'".into(),
                ));
            }
        }
        if let Some(version) = manifest.get("version") {
            if !version.is_string() {
                return Err(DomainError::InvalidManifest(
                    "'version' must be a string".into(),
                ));
            }
        }
        Ok(())
    }

    /// npm package name rules that matter for a directory-derived name.
    pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
        let reason = if name.is_empty() {
            Some("name cannot be empty")
        } else if name.len() > 214 {
            Some("name cannot be longer than 214 characters")
        } else if name.starts_with('.') || name.starts_with('_') {
            Some("name cannot start with '.' or '_'")
        } else if name.chars().any(|c| c.is_ascii_uppercase()) {
            Some("name cannot contain uppercase letters")
        } else if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~'))
        {
            Some("name may only contain lowercase letters, digits, '-', '.', '_' and '~'")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(DomainError::InvalidManifest(format!(
                "invalid project name '{name}': {reason}"
            ))),
            None => Ok(()),
        }
    }
}
