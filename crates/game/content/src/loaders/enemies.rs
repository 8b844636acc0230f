//! Enemy catalog loader.

use std::collections::HashSet;
use std::path::Path;

use combat_core::{EnemyCatalog, EnemyTemplate};

use crate::loaders::{LoadResult, read_file};

/// Loader for the enemy catalog from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    /// Load an enemy catalog from a RON file.
    ///
    /// RON format: `Vec<EnemyTemplate>`. Ids must be unique.
    pub fn load(path: &Path) -> LoadResult<EnemyCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load enemies {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<EnemyCatalog> {
        let templates: Vec<EnemyTemplate> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for template in &templates {
            if !seen.insert(template.id.as_str()) {
                anyhow::bail!("duplicate enemy id '{}'", template.id);
            }
        }

        tracing::debug!(count = templates.len(), "enemy catalog loaded");
        Ok(EnemyCatalog::new(templates))
    }
}

#[cfg(test)]
mod tests {
    use combat_core::{Attribute, EnemyCategory, EnemyOracle};

    use super::*;

    #[test]
    fn optional_fields_take_defaults() {
        let catalog = EnemyLoader::parse(
            r#"[
                (id: "drone", name: "Drone", hp: 300, atk: 40.0, def: 10.0, spd: 80.0),
                (
                    id: "warden", name: "Warden", category: boss, hp: 8000,
                    atk: 90.0, def: 60.0, spd: 60.0, attribute: Some(machine),
                    break_gauge: 400,
                ),
            ]"#,
        )
        .unwrap();

        let drone = catalog.template("drone").unwrap();
        assert_eq!(drone.category, EnemyCategory::Normal);
        assert_eq!(drone.bullet_speed, EnemyTemplate::DEFAULT_BULLET_SPEED);
        assert_eq!(drone.bullet_count, 1);

        let warden = catalog.template("warden").unwrap();
        assert!(warden.is_boss());
        assert_eq!(warden.attribute, Some(Attribute::Machine));
        assert_eq!(warden.break_gauge, 400);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = EnemyLoader::parse(
            r#"[
                (id: "drone", name: "A", hp: 1, atk: 1.0, def: 1.0, spd: 1.0),
                (id: "drone", name: "B", hp: 1, atk: 1.0, def: 1.0, spd: 1.0),
            ]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }
}
