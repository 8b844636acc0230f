//! Balance configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for balance configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`CombatConfig`] from a TOML file.
    ///
    /// Every key is optional; missing keys keep the reference balance.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse balance TOML {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse("ult_gauge_max = 500\nfield_width = 800.0\n").unwrap();
        assert_eq!(config.ult_gauge_max, 500);
        assert_eq!(config.field_width, 800.0);
        assert_eq!(config.field_height, CombatConfig::default().field_height);
    }

    #[test]
    fn empty_file_is_reference_balance() {
        assert_eq!(ConfigLoader::parse("").unwrap(), CombatConfig::default());
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(ConfigLoader::parse("ult_gauge_max = \"lots\"").is_err());
    }
}
