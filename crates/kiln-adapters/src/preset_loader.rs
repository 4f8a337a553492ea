//! Preset loading: builtin presets plus a directory of preset files.
//!
//! # Directory layout expected
//!
//! ```text
//! presets/
//! ├── spa.toml
//! └── lib.json
//! ```
//!
//! # Preset file format
//!
//! ```toml
//! description     = "SPA with router"   # optional
//! useConfigFiles  = true                # optional, default false
//!
//! [[plugins]]
//! id = "@kiln/cli-plugin-babel"
//!
//! [[plugins]]
//! id      = "eslint"                    # short ids are fine
//! version = "^1.0.0"                    # optional, default "latest"
//! options = { config = "prettier", lintOn = ["commit"] }
//! ```
//!
//! The same structure is accepted as JSON. The preset name defaults to the
//! file stem.

use std::{
    fs,
    path::{Path, PathBuf},
};

use kiln_core::{
    application::ApplicationError,
    domain::{DomainError, Preset, PresetPlugin, SERVICE_PLUGIN_ID},
    error::KilnResult,
};
use serde_json::json;
use tracing::{debug, instrument, warn};

pub const DEFAULT_PRESET: &str = "default";

/// Presets compiled into the binary.
pub fn builtin_presets() -> Vec<Preset> {
    let mut default = Preset::new(DEFAULT_PRESET)
        .with_plugin(PresetPlugin::new(SERVICE_PLUGIN_ID))
        .with_plugin(PresetPlugin::new("@kiln/cli-plugin-babel"))
        .with_plugin(
            PresetPlugin::new("@kiln/cli-plugin-eslint")
                .with_options(json!({ "config": "base", "lintOn": ["save"] })),
        );
    default.description = Some("babel + eslint".into());

    let mut minimal = Preset::new("minimal").with_plugin(PresetPlugin::new(SERVICE_PLUGIN_ID));
    minimal.description = Some("project skeleton only".into());

    vec![default, minimal]
}

/// Loads presets from the builtin table and an optional directory.
#[derive(Debug, Clone, Default)]
pub struct PresetLoader {
    presets_dir: Option<PathBuf>,
}

impl PresetLoader {
    /// Builtin presets only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also read `*.toml` and `*.json` presets from `dir`.
    ///
    /// The directory does not need to exist; a missing directory contributes
    /// no presets.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            presets_dir: Some(dir.into()),
        }
    }

    /// Every available preset. File presets replace builtins of the same
    /// name. Invalid files are skipped with a warning.
    #[instrument(skip(self))]
    pub fn load_all(&self) -> Vec<Preset> {
        let mut presets = builtin_presets();

        for preset in self.load_dir() {
            match presets.iter_mut().find(|p| p.name == preset.name) {
                Some(existing) => *existing = preset,
                None => presets.push(preset),
            }
        }

        debug!(count = presets.len(), "presets loaded");
        presets
    }

    /// A preset by name, or by path to a preset file.
    pub fn find(&self, name_or_path: &str) -> KilnResult<Preset> {
        let path = Path::new(name_or_path);
        if is_preset_file(path) && path.is_file() {
            return Ok(load_preset_file(path)?);
        }

        self.load_all()
            .into_iter()
            .find(|p| p.name == name_or_path)
            .ok_or_else(|| {
                ApplicationError::UnknownPreset {
                    name: name_or_path.to_owned(),
                }
                .into()
            })
    }

    fn load_dir(&self) -> Vec<Preset> {
        let Some(dir) = &self.presets_dir else {
            return Vec::new();
        };

        let read_dir = match fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "no preset directory");
                return Vec::new();
            }
        };

        let mut paths: Vec<PathBuf> = read_dir
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_preset_file(path))
            .collect();
        paths.sort();

        let mut presets = Vec::new();
        for path in paths {
            match load_preset_file(&path) {
                Ok(preset) => {
                    debug!(name = %preset.name, file = %path.display(), "loaded preset");
                    presets.push(preset);
                }
                Err(e) => {
                    // One bad preset must not hide the others.
                    warn!(file = %path.display(), error = %e, "skipping invalid preset");
                }
            }
        }
        presets
    }
}

fn is_preset_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("toml") | Some("json")
    )
}

/// Parse and validate one preset file.
pub fn load_preset_file(path: &Path) -> Result<Preset, DomainError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        DomainError::InvalidPreset(format!("failed to read '{}': {e}", path.display()))
    })?;

    let mut preset: Preset = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&raw).map_err(|e| {
            DomainError::InvalidPreset(format!("failed to parse '{}': {e}", path.display()))
        })?,
        _ => toml::from_str(&raw).map_err(|e| {
            DomainError::InvalidPreset(format!("failed to parse '{}': {e}", path.display()))
        })?,
    };

    if preset.name.is_empty() {
        preset.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }

    preset.validate()?;
    Ok(preset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::error::KilnError;
    use tempfile::TempDir;

    const SPA_TOML: &str = r#"
description = "SPA"
useConfigFiles = true

[[plugins]]
id = "babel"

[[plugins]]
id = "@kiln/cli-plugin-eslint"
version = "^1.2.0"
options = { config = "prettier", lintOn = ["commit"] }
"#;

    #[test]
    fn builtins_include_default_and_minimal() {
        let presets = builtin_presets();
        let default = presets.iter().find(|p| p.name == DEFAULT_PRESET).unwrap();
        assert!(default.has_plugin("babel"));
        assert!(default.has_plugin("eslint"));
        assert!(presets.iter().any(|p| p.name == "minimal"));
        for preset in &presets {
            preset.validate().unwrap();
        }
    }

    #[test]
    fn toml_preset_takes_name_from_file_stem() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("spa.toml");
        fs::write(&path, SPA_TOML).unwrap();

        let preset = load_preset_file(&path).unwrap();
        assert_eq!(preset.name, "spa");
        assert!(preset.use_config_files);
        assert_eq!(preset.plugins[1].version_or_latest(), "^1.2.0");
        assert_eq!(preset.plugins[1].options["lintOn"], json!(["commit"]));
    }

    #[test]
    fn json_preset_is_accepted() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lib.json");
        fs::write(
            &path,
            r#"{"name": "library", "plugins": [{"id": "babel", "options": {}}]}"#,
        )
        .unwrap();

        let preset = load_preset_file(&path).unwrap();
        assert_eq!(preset.name, "library");
        assert!(!preset.use_config_files);
    }

    #[test]
    fn invalid_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("spa.toml"), SPA_TOML).unwrap();
        fs::write(temp.path().join("broken.toml"), "plugins = 3").unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let names: Vec<String> = PresetLoader::with_dir(temp.path())
            .load_all()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["default", "minimal", "spa"]);
    }

    #[test]
    fn file_preset_replaces_builtin_of_same_name() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("minimal.json"),
            r#"{"plugins": [{"id": "router"}]}"#,
        )
        .unwrap();

        let minimal = PresetLoader::with_dir(temp.path()).find("minimal").unwrap();
        assert!(minimal.has_plugin("router"));
    }

    #[test]
    fn find_by_path_and_unknown_name() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("spa.toml");
        fs::write(&path, SPA_TOML).unwrap();

        let loader = PresetLoader::new();
        assert_eq!(loader.find(path.to_str().unwrap()).unwrap().name, "spa");
        assert!(matches!(
            loader.find("nope"),
            Err(KilnError::Application(ApplicationError::UnknownPreset { .. }))
        ));
    }

    #[test]
    fn missing_directory_yields_builtins() {
        let presets = PresetLoader::with_dir("/absolutely/does/not/exist").load_all();
        assert_eq!(presets.len(), builtin_presets().len());
    }
}
