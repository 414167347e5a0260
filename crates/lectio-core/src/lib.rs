//! Lectio Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Lectio
//! scripture engine, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │   lectio-cli / liturgy resolver / app   │
//! │          (Drive the service)            │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │             (BibleService)              │
//! │   Version registry, cache, dispatch     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Driven: AssetLoader, DocumentParser) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    lectio-adapters (Infrastructure)     │
//! │ (UsxParser, UsfxParser, asset loaders)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (BookCode, NormalizedRange, ParsedBook) │
//! │              No I/O                     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lectio_core::domain::{parse_reference, format_reference, ReferenceStyle};
//!
//! let range = parse_reference("Genesis 1:1-2:7").unwrap();
//! assert_eq!(format_reference(&range, ReferenceStyle::Code), "GEN 1:1-2:7");
//! ```
//!
//! Loading text goes through [`application::BibleService`], built with one
//! parser per format and one asset loader per version:
//!
//! ```rust,ignore
//! let service = BibleService::builder()
//!     .parser(Arc::new(UsxParser::default()))
//!     .version(version, Arc::new(loader))
//!     .build()?;
//! let passage = service.get_passage_by_reference("Mat 5:3-9", None).await;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BibleService, BibleServiceBuilder, MultiVersionSearch, PassageTextOptions,
        ports::{AssetLoader, DocumentParser},
    };
    pub use crate::domain::{
        BibleVersion, BookCategory, BookCode, BookNames, ComplexReference, Format,
        NormalizedRange, ParseResult, ParsedBook, ParsedChapter, ParsedVerse, Passage,
        ReferenceStyle, TextOptions, VersionId, collect_range, format_reference,
        normalize_range_order, parse_complex_reference, parse_reference, resolve_book_code,
    };
    pub use crate::error::{LectioError, LectioResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
