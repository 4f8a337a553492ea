//! The error type returned by every public kiln-core operation.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, ErrorCategory as DomainCategory};

#[derive(Debug, Error, Clone)]
pub enum KilnError {
    /// A rule of the data model was broken (bad manifest, id, path, preset).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Generation, installation or plugin lookup failed.
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// A broken invariant inside kiln itself.
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

pub type KilnResult<T> = Result<T, KilnError>;

/// How a front end should classify an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Configuration,
    Internal,
}

impl From<DomainCategory> for ErrorCategory {
    fn from(category: DomainCategory) -> Self {
        match category {
            DomainCategory::Validation => Self::Validation,
            DomainCategory::Compatibility => Self::Compatibility,
            DomainCategory::NotFound => Self::NotFound,
            DomainCategory::Internal => Self::Internal,
        }
    }
}

impl KilnError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => {
                vec!["Re-run with -vv and include the log when reporting it".into()]
            }
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category().into(),
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}
