//! Data-driven level content and loaders.
//!
//! This crate turns files into core types:
//! - Level definitions (managers, item records, phase scripts) via RON
//! - The level index that orders a campaign via RON
//! - Game configuration via TOML
//!
//! Content is consumed by the runtime and client; the core never reads files.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, LevelEntry, LevelIndex, LevelIndexLoader, LevelLoader,
    LoadResult,
};
