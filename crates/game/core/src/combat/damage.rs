//! Damage calculation.

use crate::attribute::{Archetype, Attribute, attribute_multiplier};
use crate::config::CombatConfig;
use crate::rng::CombatRng;

/// Offensive inputs of a single hit.
///
/// For projectiles these are captured when the shot is fired, so later buffs
/// or character switches never change a bullet already in flight.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackProfile {
    pub atk: f32,
    pub weapon_atk: f32,
    pub attribute: Option<Attribute>,
    pub archetype: Option<Archetype>,
    /// Crit chance in percent.
    pub crit_rate: f32,
    /// Crit damage in percent (150 = ×1.5).
    pub crit_dmg: f32,
}

/// Defensive inputs of a single hit.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefenseProfile {
    pub def: f32,
    pub attribute: Option<Attribute>,
}

/// Result of damage resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRoll {
    pub damage: u32,
    pub is_crit: bool,
}

/// Resolve a hit into final damage.
///
/// # Formula
///
/// ```text
/// raw      = atk × skill_multiplier + weapon_atk
/// attr     = attribute_multiplier(attacker, defender)
/// defense  = 1 - def / (def + 200)
/// crit     = crit_dmg / 100   if unit() < crit_rate / 100, else 1
/// jitter   = uniform(0.95, 1.05)
/// damage   = max(1, floor(raw × attr × defense × crit × jitter))
/// ```
///
/// The crit roll is drawn before the jitter roll.
pub fn resolve_damage(
    attacker: &AttackProfile,
    defender: &DefenseProfile,
    skill_multiplier: f32,
    config: &CombatConfig,
    rng: &mut impl CombatRng,
) -> DamageRoll {
    let raw = attacker.atk.max(0.0) * skill_multiplier + attacker.weapon_atk.max(0.0);
    let attr_mult = attribute_multiplier(attacker.attribute, defender.attribute, config);
    let def_mult = defense_multiplier(defender.def, config);

    let is_crit = rng.unit() < attacker.crit_rate / 100.0;
    let crit_mult = if is_crit {
        attacker.crit_dmg / 100.0
    } else {
        1.0
    };

    let jitter = rng.range(config.jitter_min, config.jitter_max);

    let damage = (raw * attr_mult * def_mult * crit_mult * jitter).floor();
    DamageRoll {
        damage: clamp_damage(damage),
        is_crit,
    }
}

/// Asymptotic mitigation factor: strictly between 0 and 1 for positive
/// defense, exactly 1 for zero or negative defense.
pub fn defense_multiplier(def: f32, config: &CombatConfig) -> f32 {
    let def = def.max(0.0);
    1.0 - def / (def + config.defense_curve)
}

/// Break-gauge damage dealt alongside a hit of `base_damage`.
///
/// `floor(base × 0.1 × (1.3 if breaker else 1.0))`.
pub fn break_damage(base_damage: u32, archetype: Option<Archetype>, config: &CombatConfig) -> u32 {
    let bonus = if archetype == Some(Archetype::Breaker) {
        config.breaker_break_bonus
    } else {
        1.0
    };
    (base_damage as f32 * config.break_damage_ratio * bonus).floor() as u32
}

/// Floors a float damage value into `[1, u32::MAX]`.
fn clamp_damage(value: f32) -> u32 {
    if value.is_nan() || value < 1.0 {
        1
    } else if value >= u32::MAX as f32 {
        u32::MAX
    } else {
        value as u32
    }
}
