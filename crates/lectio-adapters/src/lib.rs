//! Infrastructure adapters for Lectio.
//!
//! This crate implements the ports defined in `lectio-core::application::ports`.
//! It contains all markup handling and I/O operations.

pub mod assets;
pub mod parser;

// Re-export commonly used adapters
pub use assets::{FilesystemAssetLoader, InMemoryAssetLoader};
pub use parser::{UsfxParser, UsxParser, default_parsers};
