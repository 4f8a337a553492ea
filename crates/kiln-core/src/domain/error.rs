// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (errors cross the plugin boundary as values)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Invalid plugin id '{id}': {reason}")]
    InvalidPluginId { id: String, reason: String },

    #[error("Plugin '{id}' is listed more than once")]
    DuplicatePlugin { id: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the project root: {path}")]
    PathEscapesRoot { path: String },

    #[error("Invalid preset: {0}")]
    InvalidPreset(String),

    // ========================================================================
    // Compatibility Errors
    // ========================================================================
    #[error("config '{key}' cannot be written as {format}: only js modules are supported")]
    UnsupportedConfigFormat { key: String, format: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidManifest(msg) => vec![
                "Manifest fragments must be JSON objects".into(),
                format!("Details: {}", msg),
            ],
            Self::InvalidPluginId { id, .. } => vec![
                format!("'{}' is not a usable plugin id", id),
                "Full ids look like @kiln/cli-plugin-babel or kiln-cli-plugin-foo".into(),
                "Short ids like 'babel' are also accepted".into(),
            ],
            Self::DuplicatePlugin { id } => vec![
                format!("Remove the second '{}' entry from the preset", id),
            ],
            Self::UnsupportedConfigFormat { key, .. } => vec![
                format!("Keep '{}' inside package.json instead", key),
                "Run without --config-files to skip extraction".into(),
            ],
            Self::InvalidPreset(msg) => vec![
                format!("Preset problem: {}", msg),
                "Try: kiln list presets".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidManifest(_)
            | Self::InvalidPluginId { .. }
            | Self::DuplicatePlugin { .. }
            | Self::InvalidPreset(_) => ErrorCategory::Validation,
            Self::UnsupportedConfigFormat { .. } => ErrorCategory::Compatibility,
            Self::AbsolutePathNotAllowed { .. } | Self::PathEscapesRoot { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Internal,
}
