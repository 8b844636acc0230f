//! Data-driven battle content and loaders.
//!
//! This crate turns RON/TOML data files into the records `combat-core`
//! consumes:
//! - Stage definitions (RON, compact `"id:count"` wave strings)
//! - Enemy catalog (RON)
//! - Party loadouts as produced by the stat provider (RON)
//! - Balance configuration (TOML)
//!
//! Content is read once before a battle and never mutated by the simulation.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentBundle, EnemyLoader, LoadResult, PartyLoader, StageLoader,
    parse_wave_spec,
};

/// Directory holding the bundled reference content.
pub fn bundled_data_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}
