use crate::attribute::{Archetype, Attribute};
use crate::combat::{AttackProfile, DefenseProfile};
use crate::types::Vec2;

/// Shared stat and HP record of every combatant (party members, enemies,
/// bosses).
///
/// Invariant: `hp <= max_hp`. Reaching zero marks the unit dead; a dead unit
/// ignores further damage and healing until it is re-initialized.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatUnit {
    pub name: String,
    pub attribute: Option<Attribute>,
    pub archetype: Option<Archetype>,
    max_hp: u32,
    hp: u32,
    pub atk: f32,
    pub def: f32,
    pub spd: f32,
    /// Percent.
    pub crit_rate: f32,
    /// Percent.
    pub crit_dmg: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    dead: bool,
}

/// Base stats used to (re-)initialize a [`CombatUnit`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UnitStats {
    pub max_hp: u32,
    pub atk: f32,
    pub def: f32,
    pub spd: f32,
    pub crit_rate: f32,
    pub crit_dmg: f32,
}

impl CombatUnit {
    pub fn new(
        name: impl Into<String>,
        attribute: Option<Attribute>,
        archetype: Option<Archetype>,
        stats: UnitStats,
        position: Vec2,
    ) -> Self {
        Self {
            name: name.into(),
            attribute,
            archetype,
            max_hp: stats.max_hp,
            hp: stats.max_hp,
            atk: stats.atk,
            def: stats.def,
            spd: stats.spd,
            crit_rate: stats.crit_rate,
            crit_dmg: stats.crit_dmg,
            position,
            velocity: Vec2::ZERO,
            dead: stats.max_hp == 0,
        }
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }

    /// Subtracts HP. Returns true if this call killed the unit.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.dead {
            return false;
        }
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 {
            self.dead = true;
            self.velocity = Vec2::ZERO;
            return true;
        }
        false
    }

    /// Restores HP up to `max_hp`. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.dead {
            return 0;
        }
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }

    pub fn defense_profile(&self) -> DefenseProfile {
        DefenseProfile {
            def: self.def,
            attribute: self.attribute,
        }
    }

    /// Offensive snapshot with an explicit base attack and weapon attack.
    pub fn attack_profile(&self, atk: f32, weapon_atk: f32) -> AttackProfile {
        AttackProfile {
            atk,
            weapon_atk,
            attribute: self.attribute,
            archetype: self.archetype,
            crit_rate: self.crit_rate,
            crit_dmg: self.crit_dmg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(hp: u32) -> CombatUnit {
        CombatUnit::new(
            "dummy",
            None,
            None,
            UnitStats {
                max_hp: hp,
                ..UnitStats::default()
            },
            Vec2::ZERO,
        )
    }

    #[test]
    fn damage_kills_exactly_once() {
        let mut u = unit(100);
        assert!(!u.take_damage(60));
        assert_eq!(u.hp(), 40);
        assert!(u.take_damage(60));
        assert_eq!(u.hp(), 0);
        assert!(u.is_dead());
        assert!(!u.take_damage(10));
    }

    #[test]
    fn heal_is_capped_and_ignored_when_dead() {
        let mut u = unit(100);
        u.take_damage(30);
        assert_eq!(u.heal(50), 30);
        assert_eq!(u.hp(), 100);

        u.take_damage(100);
        assert_eq!(u.heal(50), 0);
        assert_eq!(u.hp(), 0);
    }
}
