//! Stage definitions and wave/area progression.
//!
//! A [`StageDefinition`] is the already-deserialized stage record: ordered
//! areas, each an ordered list of waves, each wave a multiset of enemy ids.
//! [`StageDefinition::resolve`] binds the ids to templates once at setup so
//! the [`WaveAreaDirector`] never looks anything up mid-battle.

mod director;

pub use director::{
    AreaAdvance, DefeatReport, DirectorPhase, DirectorStep, DirectorTiming, Progress,
    WaveAreaDirector, WaveStart,
};

use crate::catalog::{EnemyOracle, EnemyTemplate};
use crate::error::SetupError;

// ============================================================================
// Definitions
// ============================================================================

/// `count` copies of one enemy archetype.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaveEntry {
    pub enemy_id: String,
    pub count: u32,
}

impl WaveEntry {
    pub fn new(enemy_id: impl Into<String>, count: u32) -> Self {
        Self {
            enemy_id: enemy_id.into(),
            count,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaveDefinition {
    pub entries: Vec<WaveEntry>,
}

impl WaveDefinition {
    pub fn new(entries: impl IntoIterator<Item = WaveEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaDefinition {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Presentation hint (background theme).
    #[cfg_attr(feature = "serde", serde(default))]
    pub theme: String,
    /// Presentation hint (obstacle layout).
    #[cfg_attr(feature = "serde", serde(default))]
    pub layout: String,
    pub waves: Vec<WaveDefinition>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageDefinition {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Clear time for the third star. Never ends the battle.
    #[cfg_attr(feature = "serde", serde(default))]
    pub time_limit_secs: u32,
    pub areas: Vec<AreaDefinition>,
}

// ============================================================================
// Resolved stage
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnEntry {
    pub template: EnemyTemplate,
    pub count: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedWave {
    pub spawns: Vec<SpawnEntry>,
}

impl ResolvedWave {
    /// Number of enemies the wave spawns in total.
    pub fn enemy_count(&self) -> u32 {
        self.spawns.iter().map(|s| s.count).sum()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedArea {
    pub name: String,
    pub theme: String,
    pub layout: String,
    pub waves: Vec<ResolvedWave>,
}

/// Stage with every enemy id bound to its template.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedStage {
    pub id: String,
    pub name: String,
    pub time_limit_secs: u32,
    pub areas: Vec<ResolvedArea>,
}

impl StageDefinition {
    /// Binds enemy ids to templates.
    ///
    /// Entries with an unknown id or a zero count are dropped, and so are
    /// waves and areas left empty by that. A stage with nothing left to
    /// fight is rejected, as is any template with zero max HP.
    pub fn resolve(&self, enemies: &impl EnemyOracle) -> Result<ResolvedStage, SetupError> {
        let mut areas = Vec::with_capacity(self.areas.len());

        for area in &self.areas {
            let mut waves = Vec::with_capacity(area.waves.len());
            for wave in &area.waves {
                let mut spawns = Vec::with_capacity(wave.entries.len());
                for entry in &wave.entries {
                    if entry.count == 0 {
                        continue;
                    }
                    let Some(template) = enemies.template(&entry.enemy_id) else {
                        tracing::warn!(
                            stage = %self.id,
                            enemy = %entry.enemy_id,
                            "unknown enemy id in wave, entry dropped"
                        );
                        continue;
                    };
                    if template.hp == 0 {
                        return Err(SetupError::InvalidEnemyHp {
                            enemy: template.id.clone(),
                        });
                    }
                    spawns.push(SpawnEntry {
                        template: template.clone(),
                        count: entry.count,
                    });
                }
                if !spawns.is_empty() {
                    waves.push(ResolvedWave { spawns });
                }
            }
            if !waves.is_empty() {
                areas.push(ResolvedArea {
                    name: area.name.clone(),
                    theme: area.theme.clone(),
                    layout: area.layout.clone(),
                    waves,
                });
            }
        }

        if areas.is_empty() {
            return Err(SetupError::EmptyStage {
                stage: self.id.clone(),
            });
        }

        Ok(ResolvedStage {
            id: self.id.clone(),
            name: self.name.clone(),
            time_limit_secs: self.time_limit_secs,
            areas,
        })
    }
}
