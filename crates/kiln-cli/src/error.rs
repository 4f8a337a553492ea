//! CLI error type, exit codes and terminal rendering.
//!
//! Every failure that reaches `main` is a [`CliError`]. It knows which
//! [`ErrorCategory`] it falls into (and so which exit code to use), what the
//! user can do about it, and how to print itself.

use std::{error::Error, io, path::PathBuf};

use owo_colors::{OwoColorize, Style};
use thiserror::Error;

use kiln_core::error::{ErrorCategory as CoreCategory, KilnError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// A flag combination or value clap accepted but kiln cannot use.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    /// Target directory exists and `--force` was not given.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    /// Reading, parsing or writing a config file failed.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    #[error("Project creation failed: {0}")]
    Core(#[from] KilnError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: io::Error,
    },
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Coarse classification; one exit code per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}

impl ErrorCategory {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Internal => 1,
            Self::UserError => 2,
            Self::NotFound => 3,
            Self::Configuration => 4,
        }
    }
}

impl From<CoreCategory> for ErrorCategory {
    fn from(category: CoreCategory) -> Self {
        match category {
            CoreCategory::Validation | CoreCategory::Compatibility => Self::UserError,
            CoreCategory::NotFound => Self::NotFound,
            CoreCategory::Configuration => Self::Configuration,
            CoreCategory::Internal => Self::Internal,
        }
    }
}

impl CliError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec!["Run the command with --help for usage".into()],

            Self::ProjectExists { path } => vec![
                format!("Pick another name, or remove '{}'", path.display()),
                "Pass --force to replace the directory (its contents are deleted)".into(),
            ],

            Self::InvalidProjectName { .. } => vec![
                "Use lowercase letters, digits, '-', '.', '_' and '~'".into(),
                "Examples: my-app, web.client, app2".into(),
            ],

            Self::ConfigError { .. } => vec![
                "Show the file in use with 'kiln config path'".into(),
                "Recreate it with 'kiln init --force'".into(),
            ],

            Self::Core(core) => core.suggestions(),

            Self::IoError { .. } => {
                vec!["Check permissions and free space on the target disk".into()]
            }
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. }
            | Self::ProjectExists { .. }
            | Self::InvalidProjectName { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => core.category().into(),
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// 1 internal, 2 user error, 3 not found, 4 configuration.
    pub fn exit_code(&self) -> u8 {
        self.category().exit_code()
    }

    /// Text for stderr. The cause chain is only shown when `verbose`.
    pub fn render(&self, verbose: bool, color: bool) -> String {
        let paint = |text: &str, style: Style| {
            if color {
                text.style(style).to_string()
            } else {
                text.to_owned()
            }
        };
        let red = Style::new().red().bold();
        let dim = Style::new().dimmed();

        let mut out = format!("\n{} {}\n", paint("error:", red), self);

        if verbose {
            let mut source = self.source();
            while let Some(cause) = source {
                out.push_str(&paint(&format!("  caused by: {cause}\n"), dim));
                source = cause.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push('\n');
            for hint in &suggestions {
                out.push_str(&format!("{} {hint}\n", paint("hint:", Style::new().yellow())));
            }
        }

        if !verbose && self.source().is_some() {
            out.push_str(&paint("\nre-run with --verbose to see the cause\n", dim));
        }
        out
    }

    pub fn log(&self) {
        let category = self.category();
        match category {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(?category, "{self}");
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(?category, "{self}");
            }
        }
        if let Some(source) = self.source() {
            tracing::debug!(%source, "caused by");
        }
    }
}

/// Foreign errors that `with_cli_context` knows how to wrap.
pub trait WrapCli: Error + Send + Sync + Sized + 'static {
    fn wrap(self, message: String) -> CliError;
}

impl WrapCli for io::Error {
    fn wrap(self, message: String) -> CliError {
        CliError::IoError {
            message,
            source: self,
        }
    }
}

impl WrapCli for toml::ser::Error {
    fn wrap(self, message: String) -> CliError {
        CliError::ConfigError {
            message,
            source: Some(Box::new(self)),
        }
    }
}

impl WrapCli for toml::de::Error {
    fn wrap(self, message: String) -> CliError {
        CliError::ConfigError {
            message,
            source: Some(Box::new(self)),
        }
    }
}

/// `result.with_cli_context(|| "what was being done")?`
pub trait IntoCli<T> {
    fn with_cli_context<S: Into<String>>(self, f: impl FnOnce() -> S) -> CliResult<T>;
}

impl<T, E: WrapCli> IntoCli<T> for Result<T, E> {
    fn with_cli_context<S: Into<String>>(self, f: impl FnOnce() -> S) -> CliResult<T> {
        self.map_err(|e| e.wrap(f().into()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use kiln_core::{application::ApplicationError, domain::DomainError};

    use super::*;

    fn core(err: impl Into<KilnError>) -> CliError {
        CliError::Core(err.into())
    }

    #[test]
    fn exit_codes_follow_category() {
        let cases = [
            (core(DomainError::InvalidManifest("bad name".into())), 2),
            (core(ApplicationError::UnknownPlugin { id: "pwa".into() }), 3),
            (core(ApplicationError::TimedOut(Duration::from_secs(1))), 4),
            (
                core(ApplicationError::InstallFailed {
                    reason: "npm missing".into(),
                }),
                1,
            ),
            (
                CliError::ProjectExists {
                    path: PathBuf::from("app"),
                },
                2,
            ),
            (
                CliError::ConfigError {
                    message: "x".into(),
                    source: None,
                },
                4,
            ),
            (io::Error::other("e").into(), 1),
        ];
        for (err, code) in cases {
            assert_eq!(err.exit_code(), code, "{err}");
        }
    }

    #[test]
    fn project_exists_mentions_force() {
        let err = CliError::ProjectExists {
            path: PathBuf::from("/tmp/test"),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("--force")));
    }

    #[test]
    fn plain_render_has_hints_and_no_escape_codes() {
        let err = CliError::ProjectExists {
            path: PathBuf::from("/tmp/x"),
        };
        let text = err.render(false, false);
        assert!(text.contains("error: Project already exists at /tmp/x"));
        assert!(text.contains("hint: Pass --force"));
        assert!(!text.contains('\u{1b}'));
        assert!(!text.contains("re-run"));
    }

    #[test]
    fn cause_chain_only_when_verbose() {
        let err = CliError::IoError {
            message: "writing config".into(),
            source: io::Error::other("disk full"),
        };
        let quiet = err.render(false, false);
        assert!(!quiet.contains("disk full"));
        assert!(quiet.contains("re-run with --verbose"));

        let verbose = err.render(true, false);
        assert!(verbose.contains("caused by: disk full"));
        assert!(!verbose.contains("re-run"));
    }

    #[test]
    fn context_picks_variant_by_source_type() {
        let io: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(matches!(
            io.with_cli_context(|| "reading config"),
            Err(CliError::IoError { .. })
        ));

        let de: Result<toml::Table, toml::de::Error> = toml::from_str("[broken");
        let err = de.with_cli_context(|| "parsing config").unwrap_err();
        assert!(matches!(err, CliError::ConfigError { .. }));
        assert_eq!(err.exit_code(), 4);
    }
}
