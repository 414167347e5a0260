//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "fetch Mat 5:3-9 from the vulgate".

pub mod bible_service;

pub use bible_service::{
    BibleService, BibleServiceBuilder, MultiVersionSearch, PassageTextOptions, VersionFailure,
    VersionedVerse,
};
