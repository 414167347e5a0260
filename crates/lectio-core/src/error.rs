//! Unified error handling for Lectio Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Lectio Core operations.
///
/// This enum wraps all possible errors that can occur when using lectio-core,
/// providing a unified interface for error handling.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LectioError {
    /// Errors from the domain layer (malformed references or documents).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (registry and loading failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl LectioError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Lectio".into(),
                "Please report this issue at: https://github.com/cosecruz/lectio/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Check if this error is retryable.
    ///
    /// Loader failures are transient I/O from the caller's point of view; the
    /// registry never remembers them, so a second call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::CacheLockError)
                | Self::Application(ApplicationError::LoaderFailure { .. })
        )
    }

    /// `true` when the input was well formed but nothing matched it.
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type LectioResult<T> = Result<T, LectioError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> LectioResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> LectioResult<T> {
        self.map_err(|e| LectioError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_version_is_configuration() {
        let err: LectioError = ApplicationError::UnknownVersion { id: "x".into() }.into();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(!err.is_retryable());
    }

    #[test]
    fn asset_not_found_is_not_found() {
        let err: LectioError = ApplicationError::AssetNotFound {
            version: "vulgate".into(),
            book: "GEN".into(),
        }
        .into();
        assert!(err.is_not_found());
    }

    #[test]
    fn loader_failure_is_retryable() {
        let err: LectioError = ApplicationError::LoaderFailure {
            version: "vulgate".into(),
            book: "GEN".into(),
            reason: "timeout".into(),
        }
        .into();
        assert!(err.is_retryable());
    }

    #[test]
    fn invalid_reference_is_validation() {
        let err: LectioError = DomainError::EmptyReference.into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn context_wraps_foreign_errors() {
        let res: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
        let err = res.context("reading asset").unwrap_err();
        assert!(matches!(err, LectioError::Internal { ref message } if message.contains("boom")));
    }
}
