// ============================================================================
// domain/error.rs - REFERENCE AND DOCUMENT ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so the registry can hand the same failure to several callers)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
///
/// Malformed citations and irregular markup are expected inputs, so every
/// variant here is an ordinary return value, never a panic.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Reference is empty")]
    EmptyReference,

    #[error("Invalid reference '{input}': {reason}")]
    InvalidReference { input: String, reason: String },

    #[error("Malformed document: {reason}")]
    MalformedDocument { reason: String },

    #[error("Unknown document format '{0}'")]
    UnknownFormat(String),

    #[error("Invalid book code '{0}'")]
    InvalidBookCode(String),

    #[error("Invalid version id '{0}'")]
    InvalidVersionId(String),

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    #[error("Unknown book '{name}'")]
    UnknownBook { name: String },

    #[error("Verse not found: {reference}")]
    VerseNotFound { reference: String },
}

impl DomainError {
    pub(crate) fn invalid_reference(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EmptyReference => vec![
                "Provide a reference such as 'Genesis 1:1' or 'Mat 5:3-9'".into(),
            ],
            Self::InvalidReference { input, .. } => vec![
                format!("Could not read '{}' as a citation", input),
                "Supported forms: Book C:V, Book C:V1-V2, Book C1:V1-C2:V2".into(),
                "A bare chapter ('Genesis 1') needs a verse".into(),
            ],
            Self::UnknownBook { name } => vec![
                format!("'{}' is not a known book name or abbreviation", name),
                "Try: lectio resolve <name>".into(),
            ],
            Self::MalformedDocument { reason } => vec![
                format!("The source document could not be read: {}", reason),
                "Check that the file is well-formed USX or USFX".into(),
            ],
            Self::UnknownFormat(format) => vec![
                format!("'{}' is not a supported format", format),
                "Supported formats: usx, usfx".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyReference
            | Self::InvalidReference { .. }
            | Self::UnknownFormat(_)
            | Self::InvalidBookCode(_)
            | Self::InvalidVersionId(_) => ErrorCategory::Validation,
            Self::UnknownBook { .. } | Self::VerseNotFound { .. } => ErrorCategory::NotFound,
            Self::MalformedDocument { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
