//! Application layer errors.
//!
//! These errors represent failures in orchestration (registry setup, asset
//! loading, cache access), not in reading references or documents. Those are
//! `DomainError` from `crate::domain`.

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while the registry builds, loads or dispatches.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Version id not registered.
    #[error("Unknown version '{id}'")]
    UnknownVersion { id: String },

    /// The loader has no document for this book.
    #[error("No asset for {book} in version '{version}'")]
    AssetNotFound { version: String, book: String },

    /// The version's parser rejected the document.
    #[error("Failed to parse {book} in version '{version}': {reason}")]
    ParseFailure {
        version: String,
        book: String,
        reason: String,
    },

    /// No parser registered for a version's format.
    #[error("No parser registered for format '{format}'")]
    UnsupportedFormat { format: String },

    /// Two registrations share one version id.
    #[error("Version '{id}' is registered twice")]
    DuplicateVersion { id: String },

    /// The builder was finished without any version.
    #[error("No versions registered")]
    NoVersionsRegistered,

    /// The loader failed for a reason other than a missing asset.
    #[error("Loading {book} in version '{version}' failed: {reason}")]
    LoaderFailure {
        version: String,
        book: String,
        reason: String,
    },

    /// Cache access failed (lock poisoned).
    #[error("Book cache error")]
    CacheLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownVersion { id } => vec![
                format!("Version '{}' is not configured", id),
                "Try: lectio versions to see configured versions".into(),
            ],
            Self::AssetNotFound { version, book } => vec![
                format!("Version '{}' has no document for {}", version, book),
                "Check the version's path and file names (<BOOK>.usx, <BOOK>.usfx, <BOOK>.xml)".into(),
            ],
            Self::ParseFailure { reason, .. } => vec![
                format!("Parser reported: {}", reason),
                "Check that the version's format matches its files".into(),
            ],
            Self::UnsupportedFormat { format } => vec![
                format!("No parser handles '{}'", format),
                "Supported formats: usx, usfx".into(),
            ],
            Self::DuplicateVersion { id } => vec![
                format!("Remove the second [[versions]] entry with id '{}'", id),
            ],
            Self::NoVersionsRegistered => vec![
                "Add at least one [[versions]] entry to the configuration".into(),
                "Try: lectio init".into(),
            ],
            Self::LoaderFailure { .. } | Self::CacheLockError => vec![
                "The failure was not cached".into(),
                "Try again in a moment".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AssetNotFound { .. } => ErrorCategory::NotFound,
            Self::UnknownVersion { .. }
            | Self::UnsupportedFormat { .. }
            | Self::DuplicateVersion { .. }
            | Self::NoVersionsRegistered => ErrorCategory::Configuration,
            Self::ParseFailure { .. } | Self::LoaderFailure { .. } | Self::CacheLockError => {
                ErrorCategory::Internal
            }
        }
    }
}
