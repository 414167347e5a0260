//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `lectio-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `AssetLoader`: Raw document retrieval per version
//!   - `DocumentParser`: One serialization format to a `ParsedBook`
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (The `BibleService` surface, driven by the CLI or an embedding app)

pub mod output;

pub use output::{AssetLoader, DocumentParser};

#[cfg(test)]
pub use output::MockAssetLoader;
