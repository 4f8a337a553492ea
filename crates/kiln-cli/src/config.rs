//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `KILN_*` environment variables, `__` between nested keys
//!    (`KILN_INSTALL__SKIP=true`)
//! 3. `--config FILE`, or else `.kiln.toml` in the current directory over
//!    the platform config file
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// File name of the per-project configuration.
pub const LOCAL_CONFIG_FILE: &str = ".kiln.toml";

/// Every key `config get` / `config set` understand.
pub const KNOWN_KEYS: &[&str] = &[
    "defaults.preset",
    "generation.sort_manifest",
    "generation.timeout_secs",
    "install.skip",
    "install.command",
    "output.no_color",
    "output.format",
    "presets.local_path",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for new projects.
    pub defaults: Defaults,
    pub generation: GenerationConfig,
    pub install: InstallConfig,
    pub output: OutputConfig,
    pub presets: PresetConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub preset: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            preset: kiln_adapters::DEFAULT_PRESET.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Canonical key order in the written package.json.
    pub sort_manifest: bool,
    /// Deadline for the whole generation run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            sort_manifest: true,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    pub skip: bool,
    /// Package manager executable.
    pub command: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            skip: false,
            command: "npm".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetConfig {
    /// Directory of additional `*.toml` / `*.json` presets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from files and the environment over the defaults.
    ///
    /// Missing files are not an error; malformed ones are.
    pub fn load(config_file: Option<&PathBuf>) -> CliResult<Self> {
        let mut builder = Config::builder();

        match config_file {
            Some(path) => {
                debug!(path = %path.display(), "using explicit config file");
                builder = builder.add_source(toml_file(path));
            }
            None => {
                builder = builder
                    .add_source(toml_file(&Self::config_path()))
                    .add_source(toml_file(Path::new(LOCAL_CONFIG_FILE)));
            }
        }

        let config = builder
            .add_source(
                Environment::with_prefix("KILN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| CliError::ConfigError {
                message: format!("failed to read configuration: {e}"),
                source: Some(Box::new(e)),
            })?;

        config.try_deserialize().map_err(|e| CliError::ConfigError {
            message: format!("invalid configuration: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Path to the global configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.kiln.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "kiln", "kiln")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The file `config set` writes to.
    pub fn active_path(explicit: Option<&PathBuf>) -> PathBuf {
        explicit.cloned().unwrap_or_else(Self::config_path)
    }

    /// Value of a dotted key, rendered as text. Unset optional keys are empty.
    pub fn get(&self, key: &str) -> CliResult<String> {
        let value = match key {
            "defaults.preset" => self.defaults.preset.clone(),
            "generation.sort_manifest" => self.generation.sort_manifest.to_string(),
            "generation.timeout_secs" => self
                .generation
                .timeout_secs
                .map(|s| s.to_string())
                .unwrap_or_default(),
            "install.skip" => self.install.skip.to_string(),
            "install.command" => self.install.command.clone(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            "presets.local_path" => self
                .presets
                .local_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }
}

fn toml_file(path: &Path) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml).required(false)
}

pub fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!(
            "unknown config key '{key}' (known keys: {})",
            KNOWN_KEYS.join(", ")
        ),
        source: None,
    }
}
