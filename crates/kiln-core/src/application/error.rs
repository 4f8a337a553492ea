//! Application layer errors.
//!
//! These errors represent failures in orchestration, not domain rules.
//! Domain rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while running plugins, steps and I/O.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A template failed to parse or render.
    #[error("Template error in {path}: {reason}")]
    TemplateError { path: PathBuf, reason: String },

    /// A plugin's `apply` returned an error.
    #[error("Plugin '{plugin}' failed during setup: {reason}")]
    PluginSetupFailed { plugin: String, reason: String },

    /// A deferred step failed for a reason other than a template error.
    #[error("Deferred step from plugin '{plugin}' failed: {reason}")]
    StepFailed { plugin: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Generation did not finish before its deadline.
    #[error("Generation timed out after {0:?}")]
    TimedOut(Duration),

    /// The package manager exited unsuccessfully or could not be spawned.
    #[error("Dependency installation failed: {reason}")]
    InstallFailed { reason: String },

    /// A preset names a plugin the registry does not know.
    #[error("Unknown plugin '{id}'")]
    UnknownPlugin { id: String },

    /// A preset could not be found by name.
    #[error("Unknown preset '{name}'")]
    UnknownPreset { name: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateError { path, .. } => vec![
                format!("Check the template syntax in {}", path.display()),
                "Templates use handlebars: {{name}}, {{#if}}, {{#each}}".into(),
            ],
            Self::PluginSetupFailed { plugin, .. } | Self::StepFailed { plugin, .. } => vec![
                format!("Plugin '{}' reported an error", plugin),
                "Check the plugin options in your preset".into(),
                "Re-run with -vv for a detailed log".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "The project directory may be partially written".into(),
            ],
            Self::TimedOut(_) => vec![
                "Raise generation.timeout_secs or unset it".into(),
            ],
            Self::InstallFailed { .. } => vec![
                "Run the install command manually inside the project".into(),
                "Or pass --skip-install".into(),
            ],
            Self::UnknownPlugin { id } => vec![
                format!("'{}' is not a registered plugin", id),
                "Try: kiln list plugins".into(),
            ],
            Self::UnknownPreset { name } => vec![
                format!("No preset named '{}'", name),
                "Try: kiln list presets".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownPlugin { .. } | Self::UnknownPreset { .. } => ErrorCategory::NotFound,
            Self::TimedOut(_) => ErrorCategory::Configuration,
            Self::TemplateError { .. }
            | Self::PluginSetupFailed { .. }
            | Self::StepFailed { .. }
            | Self::FilesystemError { .. }
            | Self::InstallFailed { .. } => ErrorCategory::Internal,
        }
    }
}
