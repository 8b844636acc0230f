//! Pre-computed inputs supplied by content and stat providers.
//!
//! The core never derives stats itself: enemy templates come from a catalog
//! behind [`EnemyOracle`] and party members arrive as [`MemberLoadout`]s with
//! final numbers already baked in by the equipment/leveling collaborator.

use std::collections::HashMap;

use crate::attribute::{Archetype, Attribute};
use crate::entity::WeaponKind;
use crate::skills::SkillLoadout;

// ============================================================================
// Enemies
// ============================================================================

/// Enemy tier. Bosses get a break gauge and phase patterns.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EnemyCategory {
    #[default]
    Normal,
    Elite,
    Boss,
}

/// Enemy archetype definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: EnemyCategory,
    pub hp: u32,
    pub atk: f32,
    pub def: f32,
    pub spd: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attribute: Option<Attribute>,
    /// Attack-pattern tag; unknown tags fall back to `chase_shoot`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack_pattern: String,
    #[cfg_attr(feature = "serde", serde(default = "default_bullet_speed"))]
    pub bullet_speed: f32,
    /// Volleys per second.
    #[cfg_attr(feature = "serde", serde(default = "default_fire_rate"))]
    pub fire_rate: f32,
    #[cfg_attr(feature = "serde", serde(default = "default_bullet_count"))]
    pub bullet_count: u32,
    /// Break gauge capacity (bosses only). Zero makes the boss unbreakable.
    #[cfg_attr(feature = "serde", serde(default = "default_break_gauge"))]
    pub break_gauge: u32,
}

#[cfg(feature = "serde")]
fn default_bullet_speed() -> f32 {
    EnemyTemplate::DEFAULT_BULLET_SPEED
}

#[cfg(feature = "serde")]
fn default_fire_rate() -> f32 {
    EnemyTemplate::DEFAULT_FIRE_RATE
}

#[cfg(feature = "serde")]
fn default_bullet_count() -> u32 {
    1
}

#[cfg(feature = "serde")]
fn default_break_gauge() -> u32 {
    EnemyTemplate::DEFAULT_BREAK_GAUGE
}

impl EnemyTemplate {
    pub const DEFAULT_BULLET_SPEED: f32 = 200.0;
    pub const DEFAULT_FIRE_RATE: f32 = 1.0;
    pub const DEFAULT_BREAK_GAUGE: u32 = 1000;

    /// Template with reference defaults for every optional field.
    pub fn new(id: impl Into<String>, hp: u32, atk: f32, def: f32, spd: f32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            category: EnemyCategory::Normal,
            hp,
            atk,
            def,
            spd,
            attribute: None,
            attack_pattern: String::new(),
            bullet_speed: Self::DEFAULT_BULLET_SPEED,
            fire_rate: Self::DEFAULT_FIRE_RATE,
            bullet_count: 1,
            break_gauge: Self::DEFAULT_BREAK_GAUGE,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.category == EnemyCategory::Boss
    }
}

/// Read access to enemy templates by id.
pub trait EnemyOracle {
    fn template(&self, id: &str) -> Option<&EnemyTemplate>;
}

/// In-memory enemy catalog.
#[derive(Clone, Debug, Default)]
pub struct EnemyCatalog {
    templates: HashMap<String, EnemyTemplate>,
}

impl EnemyCatalog {
    pub fn new(templates: impl IntoIterator<Item = EnemyTemplate>) -> Self {
        Self {
            templates: templates.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }

    pub fn insert(&mut self, template: EnemyTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl EnemyOracle for EnemyCatalog {
    fn template(&self, id: &str) -> Option<&EnemyTemplate> {
        self.templates.get(id)
    }
}

// ============================================================================
// Party members
// ============================================================================

/// Final stats of a party member as computed by the stat provider.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MemberStats {
    pub hp: u32,
    pub atk: f32,
    pub def: f32,
    pub spd: f32,
    pub crit_rate: f32,
    pub crit_dmg: f32,
    /// Contribution to the party-wide shield pool.
    pub shield: u32,
    pub weapon_atk: f32,
}

impl Default for MemberStats {
    fn default() -> Self {
        Self {
            hp: 1000,
            atk: 100.0,
            def: 50.0,
            spd: 150.0,
            crit_rate: 5.0,
            crit_dmg: 150.0,
            shield: 0,
            weapon_atk: 0.0,
        }
    }
}

/// Everything needed to field one party member.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberLoadout {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attribute: Option<Attribute>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub archetype: Archetype,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weapon: WeaponKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: MemberStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: SkillLoadout,
}

impl MemberLoadout {
    pub fn new(id: impl Into<String>, archetype: Archetype, stats: MemberStats) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            attribute: None,
            archetype,
            weapon: WeaponKind::default(),
            stats,
            skills: SkillLoadout::default(),
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup_by_id() {
        let catalog = EnemyCatalog::new([
            EnemyTemplate::new("drone", 100, 10.0, 5.0, 80.0),
            EnemyTemplate::new("elite", 400, 20.0, 15.0, 60.0),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.template("elite").map(|t| t.hp), Some(400));
        assert!(catalog.template("ghost").is_none());
    }

    #[test]
    fn template_defaults_match_reference() {
        let t = EnemyTemplate::new("drone", 100, 10.0, 5.0, 80.0);
        assert_eq!(t.bullet_speed, 200.0);
        assert_eq!(t.fire_rate, 1.0);
        assert_eq!(t.bullet_count, 1);
        assert_eq!(t.break_gauge, 1000);
        assert!(!t.is_boss());
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let mut loadout = MemberLoadout::new("rin", Archetype::Dps, MemberStats::default());
        loadout.name.clear();
        assert_eq!(loadout.display_name(), "rin");
    }
}
