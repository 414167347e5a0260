//! One module per subcommand.
//!
//! Commands that read text build the registry from config themselves, so
//! `init`, `parse`, `resolve` and `completions` work without any library.

pub mod completions;
pub mod init;
pub mod parse;
pub mod passage;
pub mod resolve;
pub mod search;
pub mod stats;
pub mod versions;
