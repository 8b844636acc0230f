//! One-call loading of everything a battle needs.

use std::path::Path;

use combat_core::{BattleSetup, CombatConfig, EnemyCatalog, MemberLoadout, StageDefinition};

use crate::loaders::{ConfigLoader, EnemyLoader, LoadResult, PartyLoader, StageLoader};

/// Battle content loaded from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── balance.toml   (optional)
/// ├── enemies.ron
/// ├── party.ron
/// └── stage.ron      (or any stage file name)
/// ```
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub stage: StageDefinition,
    pub enemies: EnemyCatalog,
    pub party: Vec<MemberLoadout>,
    pub config: CombatConfig,
}

impl ContentBundle {
    pub const ENEMIES_FILE: &'static str = "enemies.ron";
    pub const PARTY_FILE: &'static str = "party.ron";
    pub const BALANCE_FILE: &'static str = "balance.toml";

    /// Loads the stage file `stage_file` plus the shared enemy, party and
    /// balance files from `data_dir`. A missing balance file means the
    /// reference balance.
    pub fn load_dir(data_dir: impl AsRef<Path>, stage_file: impl AsRef<Path>) -> LoadResult<Self> {
        let data_dir = data_dir.as_ref();

        let stage = StageLoader::load(&data_dir.join(stage_file))?;
        let enemies = EnemyLoader::load(&data_dir.join(Self::ENEMIES_FILE))?;
        let party = PartyLoader::load(&data_dir.join(Self::PARTY_FILE))?;

        let balance = data_dir.join(Self::BALANCE_FILE);
        let config = if balance.exists() {
            ConfigLoader::load(&balance)?
        } else {
            tracing::debug!(path = %balance.display(), "no balance file, using reference balance");
            CombatConfig::default()
        };

        tracing::info!(
            stage = %stage.id,
            areas = stage.areas.len(),
            enemies = enemies.len(),
            members = party.len(),
            "content loaded"
        );

        Ok(Self {
            stage,
            enemies,
            party,
            config,
        })
    }

    /// Splits the bundle into the battle setup and the catalog it resolves
    /// against.
    pub fn into_setup(self) -> (BattleSetup, EnemyCatalog) {
        let setup = BattleSetup {
            stage: self.stage,
            party: self.party,
            config: self.config,
        };
        (setup, self.enemies)
    }
}
