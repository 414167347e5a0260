//! Application layer for Lectio.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (BibleService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! text-handling rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    BibleService, BibleServiceBuilder, MultiVersionSearch, PassageTextOptions, VersionFailure,
    VersionedVerse,
};

// Re-export port traits (for adapter implementation)
pub use ports::{AssetLoader, DocumentParser};

pub use error::ApplicationError;
