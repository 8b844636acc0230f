//! Skill cooldowns and the ultimate gauge.
//!
//! Every party member owns a [`SkillBook`]: two cooldown-gated skill slots
//! plus an ultimate meter charged by combat events.

use crate::config::CombatConfig;

// ============================================================================
// Skill definitions (stat-provider input)
// ============================================================================

/// Cooldown-gated skill slot.
#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum SkillSlot {
    Skill1,
    Skill2,
}

impl SkillSlot {
    pub const ALL: [SkillSlot; CombatConfig::SKILL_SLOTS] = [SkillSlot::Skill1, SkillSlot::Skill2];

    pub const fn index(self) -> usize {
        match self {
            Self::Skill1 => 0,
            Self::Skill2 => 1,
        }
    }
}

/// Parameters of one skill slot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillSpec {
    /// Cooldown override; the balance default applies when absent.
    pub cooldown_ms: Option<u32>,
    /// Damage multiplier on atk. Zero or less means no damage projectiles.
    pub multiplier: f32,
    /// Projectiles per use (skill2 only; skill1 always fires one).
    pub hits: u32,
}

impl Default for SkillSpec {
    fn default() -> Self {
        Self {
            cooldown_ms: None,
            multiplier: 0.0,
            hits: 1,
        }
    }
}

/// Parameters of the ultimate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UltSpec {
    pub name: String,
    pub multiplier: f32,
}

impl Default for UltSpec {
    fn default() -> Self {
        Self {
            name: "ULT".to_string(),
            multiplier: 3.0,
        }
    }
}

/// Full skill kit of a party member.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillLoadout {
    pub skill1: SkillSpec,
    pub skill2: SkillSpec,
    pub ult: UltSpec,
}

// ============================================================================
// Gauges
// ============================================================================

/// Countdown timer gating one skill slot.
///
/// Starts ready (`current == 0`). A successful use resets `current` to `max`;
/// [`tick`](Self::tick) counts it back down, clamped at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownGauge {
    current_ms: u32,
    max_ms: u32,
}

impl CooldownGauge {
    pub fn new(max_ms: u32) -> Self {
        Self {
            current_ms: 0,
            max_ms,
        }
    }

    pub fn current_ms(&self) -> u32 {
        self.current_ms
    }

    pub fn max_ms(&self) -> u32 {
        self.max_ms
    }

    pub fn is_ready(&self) -> bool {
        self.current_ms == 0
    }

    /// Consumes the skill. Fails without touching state while cooling down.
    pub fn try_use(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.current_ms = self.max_ms;
        true
    }

    pub fn tick(&mut self, dt_ms: u32) {
        self.current_ms = self.current_ms.saturating_sub(dt_ms);
    }

    /// Whole seconds left, rounded up.
    pub fn remaining_secs(&self) -> u32 {
        self.current_ms.div_ceil(1000)
    }

    /// Fraction of the cooldown still pending, in `[0, 1]`.
    pub fn ratio(&self) -> f32 {
        if self.max_ms == 0 {
            0.0
        } else {
            self.current_ms as f32 / self.max_ms as f32
        }
    }
}

/// Charge meter for the ultimate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UltGauge {
    current: u32,
    max: u32,
}

impl UltGauge {
    pub fn new(max: u32) -> Self {
        Self { current: 0, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_ready(&self) -> bool {
        self.current >= self.max
    }

    /// Adds charge, clamped at `max`. Returns the new value.
    pub fn add(&mut self, amount: u32) -> u32 {
        self.current = self.current.saturating_add(amount).min(self.max);
        self.current
    }

    /// Spends a full gauge. Fails below `max`; success resets to zero.
    pub fn try_use(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.current = 0;
        true
    }

    pub fn ratio(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }
}

// ============================================================================
// SkillBook
// ============================================================================

/// Per-member skill state: two cooldown slots and one ultimate gauge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkillBook {
    cooldowns: [CooldownGauge; CombatConfig::SKILL_SLOTS],
    loadout: SkillLoadout,
    ult: UltGauge,
}

impl SkillBook {
    pub fn new(loadout: SkillLoadout, config: &CombatConfig) -> Self {
        let skill1 = loadout
            .skill1
            .cooldown_ms
            .unwrap_or(config.default_skill1_cooldown_ms);
        let skill2 = loadout
            .skill2
            .cooldown_ms
            .unwrap_or(config.default_skill2_cooldown_ms);

        Self {
            cooldowns: [CooldownGauge::new(skill1), CooldownGauge::new(skill2)],
            loadout,
            ult: UltGauge::new(config.ult_gauge_max),
        }
    }

    pub fn cooldown(&self, slot: SkillSlot) -> &CooldownGauge {
        &self.cooldowns[slot.index()]
    }

    pub fn spec(&self, slot: SkillSlot) -> &SkillSpec {
        match slot {
            SkillSlot::Skill1 => &self.loadout.skill1,
            SkillSlot::Skill2 => &self.loadout.skill2,
        }
    }

    pub fn ult_spec(&self) -> &UltSpec {
        &self.loadout.ult
    }

    pub fn ult(&self) -> &UltGauge {
        &self.ult
    }

    pub fn ult_mut(&mut self) -> &mut UltGauge {
        &mut self.ult
    }

    pub fn try_use(&mut self, slot: SkillSlot) -> bool {
        self.cooldowns[slot.index()].try_use()
    }

    pub fn try_use_ult(&mut self) -> bool {
        self.ult.try_use()
    }

    /// Advances every cooldown by the elapsed time.
    pub fn tick(&mut self, dt_ms: u32) {
        for gauge in &mut self.cooldowns {
            gauge.tick(dt_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_gate_is_monotonic() {
        let mut gauge = CooldownGauge::new(10_000);
        assert!(gauge.try_use());
        assert_eq!(gauge.current_ms(), 10_000);

        gauge.tick(3_000);
        assert!(!gauge.try_use());
        assert_eq!(gauge.current_ms(), 7_000);

        gauge.tick(6_999);
        assert!(!gauge.try_use());
        assert_eq!(gauge.current_ms(), 1);

        gauge.tick(50);
        assert_eq!(gauge.current_ms(), 0);
        assert!(gauge.try_use());
    }

    #[test]
    fn remaining_secs_rounds_up() {
        let mut gauge = CooldownGauge::new(2_500);
        gauge.try_use();
        assert_eq!(gauge.remaining_secs(), 3);
        gauge.tick(1_500);
        assert_eq!(gauge.remaining_secs(), 1);
    }

    #[test]
    fn ult_gauge_clamps_and_resets() {
        let mut ult = UltGauge::new(100);
        assert!(!ult.try_use());
        assert_eq!(ult.add(70), 70);
        assert_eq!(ult.add(70), 100);
        assert!(ult.is_ready());
        assert!(ult.try_use());
        assert_eq!(ult.current(), 0);
        assert!(!ult.try_use());
    }

    #[test]
    fn skill_book_uses_default_cooldowns() {
        let config = CombatConfig::default();
        let mut loadout = SkillLoadout::default();
        loadout.skill2.cooldown_ms = Some(4_000);

        let book = SkillBook::new(loadout, &config);
        assert_eq!(book.cooldown(SkillSlot::Skill1).max_ms(), 10_000);
        assert_eq!(book.cooldown(SkillSlot::Skill2).max_ms(), 4_000);
        assert_eq!(book.ult().max(), 1_000);
        assert_eq!(book.ult_spec().multiplier, 3.0);
    }

    #[test]
    fn skill_slot_parses_case_insensitively() {
        assert_eq!("SKILL1".parse::<SkillSlot>(), Ok(SkillSlot::Skill1));
        assert_eq!(SkillSlot::Skill2.as_ref(), "skill2");
    }
}
