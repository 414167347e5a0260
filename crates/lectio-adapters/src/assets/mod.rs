//! Asset loaders: where raw book documents come from.

mod local;
mod memory;

pub use local::FilesystemAssetLoader;
pub use memory::InMemoryAssetLoader;
