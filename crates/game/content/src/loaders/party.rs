//! Party loadout loader.
//!
//! Loadouts are the output of the stat provider (equipment and level
//! already folded into `stats`); the battle consumes them as-is.

use std::path::Path;

use combat_core::{CombatConfig, MemberLoadout};

use crate::loaders::{LoadResult, read_file};

/// Loader for party loadouts from RON files.
pub struct PartyLoader;

impl PartyLoader {
    /// Load a party from a RON file.
    ///
    /// RON format: `Vec<MemberLoadout>`, first entry starts active.
    pub fn load(path: &Path) -> LoadResult<Vec<MemberLoadout>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load party {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<MemberLoadout>> {
        let party: Vec<MemberLoadout> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse party RON: {}", e))?;

        if party.is_empty() {
            anyhow::bail!("party has no members");
        }
        if party.len() > CombatConfig::MAX_PARTY {
            anyhow::bail!(
                "party has {} members, at most {} allowed",
                party.len(),
                CombatConfig::MAX_PARTY
            );
        }
        Ok(party)
    }
}
