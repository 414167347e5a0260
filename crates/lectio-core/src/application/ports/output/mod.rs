//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `lectio-adapters` crate provides implementations.

use async_trait::async_trait;

use crate::domain::{
    BookCode, BookStats, DomainError, Format, ParseResult, ParsedBook, ParsedVerse, VersionId,
};
use crate::error::LectioResult;

/// Port for raw document retrieval.
///
/// Implemented by:
/// - `lectio_adapters::assets::InMemoryAssetLoader` (tests, embedded content)
/// - `lectio_adapters::assets::FilesystemAssetLoader` (one directory per version)
///
/// ## Design Notes
///
/// - `load_raw` is the registry's only suspension point
/// - A missing document is `ApplicationError::AssetNotFound`; any other
///   failure is `ApplicationError::LoaderFailure`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetLoader: Send + Sync {
    /// Fetch the serialized document for one book of one version.
    async fn load_raw(&self, version: &VersionId, book: &BookCode) -> LectioResult<String>;

    /// Books this loader can serve for `version`, in no particular order.
    async fn list_available_books(&self, version: &VersionId) -> LectioResult<Vec<BookCode>>;

    /// Whether `load_raw` would find a document.
    async fn is_available(&self, version: &VersionId, book: &BookCode) -> bool;
}

/// Port for one document serialization format.
///
/// Implemented by:
/// - `lectio_adapters::parser::UsxParser`
/// - `lectio_adapters::parser::UsfxParser`
///
/// Only `format` and `parse` differ between formats. The lookups after
/// parsing work on the tree and are provided here once.
pub trait DocumentParser: Send + Sync {
    /// The format this parser reads.
    fn format(&self) -> Format;

    /// Parse one serialized book.
    ///
    /// # Errors
    ///
    /// `DomainError::MalformedDocument` for markup that is not well formed or
    /// has no book code. No partial book is returned.
    fn parse(&self, raw: &str) -> Result<ParseResult, DomainError>;

    fn verse_by_reference<'a>(
        &self,
        book: &'a ParsedBook,
        reference: &str,
    ) -> Option<&'a ParsedVerse> {
        book.verse_by_reference(reference)
    }

    fn verse_range(&self, book: &ParsedBook, start_ref: &str, end_ref: &str) -> Vec<ParsedVerse> {
        book.verse_range(start_ref, end_ref)
    }

    fn search_in_book(
        &self,
        book: &ParsedBook,
        text: &str,
        case_sensitive: bool,
    ) -> Vec<ParsedVerse> {
        book.search(text, case_sensitive)
    }

    fn book_stats(&self, book: &ParsedBook) -> BookStats {
        book.stats()
    }
}
