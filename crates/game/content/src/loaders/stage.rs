//! Stage definition loader.
//!
//! Stage files describe waves with the compact `"id:count, id:count"` string
//! form used by level designers; this loader expands them into
//! [`WaveDefinition`]s.

use std::path::Path;

use combat_core::{AreaDefinition, StageDefinition, WaveDefinition, WaveEntry};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// Stage record as written in RON files.
#[derive(Debug, Clone, Deserialize)]
struct StageRon {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    time_limit_secs: u32,
    areas: Vec<AreaRon>,
}

#[derive(Debug, Clone, Deserialize)]
struct AreaRon {
    #[serde(default)]
    name: String,
    #[serde(default)]
    theme: String,
    #[serde(default)]
    layout: String,
    waves: Vec<String>,
}

/// Loader for stage definitions from RON files.
pub struct StageLoader;

impl StageLoader {
    pub fn load(path: &Path) -> LoadResult<StageDefinition> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load stage {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<StageDefinition> {
        let raw: StageRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse stage RON: {}", e))?;

        let mut areas = Vec::with_capacity(raw.areas.len());
        for (area_index, area) in raw.areas.into_iter().enumerate() {
            let waves = area
                .waves
                .iter()
                .enumerate()
                .map(|(wave_index, spec)| {
                    parse_wave_spec(spec).map_err(|e| {
                        anyhow::anyhow!("area[{}] wave[{}]: {}", area_index, wave_index, e)
                    })
                })
                .collect::<LoadResult<Vec<_>>>()?;

            areas.push(AreaDefinition {
                name: area.name,
                theme: area.theme,
                layout: area.layout,
                waves,
            });
        }

        let name = if raw.name.is_empty() {
            raw.id.clone()
        } else {
            raw.name
        };

        Ok(StageDefinition {
            id: raw.id,
            name,
            time_limit_secs: raw.time_limit_secs,
            areas,
        })
    }
}

/// Parses a compact wave string such as `"drone:2, elite:1"`.
///
/// Entries are separated by commas and surrounding whitespace is ignored.
/// Every entry must be `id:count` with a non-empty id and an unsigned count.
pub fn parse_wave_spec(spec: &str) -> LoadResult<WaveDefinition> {
    if spec.trim().is_empty() {
        anyhow::bail!("empty wave spec");
    }

    let entries = spec
        .split(',')
        .map(|entry| -> LoadResult<WaveEntry> {
            let entry = entry.trim();
            let (id, count) = entry.split_once(':').ok_or_else(|| {
                anyhow::anyhow!("malformed wave entry '{}': expected id:count", entry)
            })?;
            let id = id.trim();
            if id.is_empty() {
                anyhow::bail!("malformed wave entry '{}': missing enemy id", entry);
            }
            let count: u32 = count
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("malformed wave entry '{}': bad count", entry))?;
            Ok(WaveEntry::new(id, count))
        })
        .collect::<LoadResult<Vec<_>>>()?;

    Ok(WaveDefinition::new(entries))
}
