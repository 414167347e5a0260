pub mod book;
pub mod passage;
pub mod version;

pub use book::{BookStats, DocumentMetadata, ParseResult, ParsedBook, ParsedChapter, ParsedVerse};
pub use passage::Passage;
pub use version::{BibleVersion, BookNameTable, BookNames};
