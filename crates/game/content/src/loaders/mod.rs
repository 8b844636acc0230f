//! Content loaders for reading battle data from files.

pub mod bundle;
pub mod config;
pub mod enemies;
pub mod party;
pub mod stage;

pub use bundle::ContentBundle;
pub use config::ConfigLoader;
pub use enemies::EnemyLoader;
pub use party::PartyLoader;
pub use stage::{StageLoader, parse_wave_spec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
