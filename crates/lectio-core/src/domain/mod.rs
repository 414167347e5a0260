// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Lectio.
//!
//! Pure logic over scripture text: the book catalogue, the citation grammar,
//! the parsed book tree and range assembly. Loading and parsing raw documents
//! happen behind ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable entities**: A parsed book never changes after construction
//! - **Rich domain model**: Lookup, search and stats live on `ParsedBook`
//!
// Public API - what the world sees
pub mod assembly;
pub mod books;
pub mod entities;
pub mod error;
pub mod reference;
pub mod value_objects;

// Re-exports for convenience
pub use assembly::collect_range;

pub use books::{
    BookInfo, all_books, book_info, books_in, canonical_position, normalize_book_name,
    resolve_book_code, sort_canonical,
};

pub use entities::{
    BibleVersion, BookNameTable, BookNames, BookStats, DocumentMetadata, ParseResult, ParsedBook,
    ParsedChapter, ParsedVerse, Passage,
};

pub use error::{DomainError, ErrorCategory};

pub use reference::{
    ComplexReference, NormalizedRange, SubRange, book_label, format_complex_reference,
    format_reference, normalize_range_order, parse_complex_reference, parse_reference,
};

pub use value_objects::{
    BookCategory, BookCode, CategoryTag, Format, ReferenceStyle, TextOptions, VersionId,
};
