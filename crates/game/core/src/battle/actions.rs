//! Player-facing commands and the active member's auto-fire.

use crate::attribute::Archetype;
use crate::battle::Battle;
use crate::entity::{BuffStat, Launch, ProjectileFlags};
use crate::events::CombatEvent;
use crate::rng::CombatRng;
use crate::skills::SkillSlot;
use crate::types::Vec2;

/// Projectiles in an ultimate fan.
const ULT_BULLETS: u32 = 12;
/// Total width of the ultimate fan, in degrees.
const ULT_FAN_DEG: f32 = 60.0;
/// Random aim offset band of skill projectiles, in radians.
const SKILL_SPREAD_RAD: f32 = 0.3;

impl<R: CombatRng> Battle<R> {
    // ========================================================================
    // Movement & party
    // ========================================================================

    /// Sets the active member's movement input. Zero stops it.
    pub fn steer(&mut self, direction: Vec2) {
        self.party.set_steer(direction);
    }

    /// Makes `index` the active member. Fails without side effects if the
    /// index is out of range, already active, or dead.
    pub fn switch_character(&mut self, index: usize) -> bool {
        if !self.is_running() || !self.party.switch_to(index) {
            return false;
        }
        self.events.push(CombatEvent::CharSwitched {
            member: index,
            id: self.party.active().id.clone(),
        });
        tracing::debug!(member = index, "switched character");
        true
    }

    /// Dodges the active member toward `direction`.
    pub fn dodge(&mut self, direction: Vec2) -> bool {
        self.is_running() && self.party.active_mut().dodge(direction, &self.config)
    }

    // ========================================================================
    // Skills
    // ========================================================================

    /// Uses a skill of the active member.
    ///
    /// Returns false when the slot is cooling down (state untouched). On
    /// success the cooldown restarts even if the effect finds nothing to act
    /// on.
    pub fn use_skill(&mut self, slot: SkillSlot) -> bool {
        if !self.is_running() {
            return false;
        }
        let index = self.party.active_index();
        let member = self.party.active_mut();
        if !member.is_alive() || !member.skills.try_use(slot) {
            return false;
        }
        let archetype = member.unit.archetype.unwrap_or_default();
        self.events.push(CombatEvent::SkillUsed { member: index, slot });

        match (archetype, slot) {
            (Archetype::Medic, SkillSlot::Skill1) => {
                let amount = percent_of(member.unit.max_hp(), 0.2);
                member.unit.heal(amount);
                self.emit_hp(index);
            }
            (Archetype::Medic, SkillSlot::Skill2) => {
                for i in 0..self.party.len() {
                    let Some(m) = self.party.member_mut(i).filter(|m| m.is_alive()) else {
                        continue;
                    };
                    let amount = percent_of(m.unit.max_hp(), 0.1);
                    m.unit.heal(amount);
                    self.emit_hp(i);
                }
            }
            (Archetype::Tank, SkillSlot::Skill2) => {
                self.shield.heal(self.config.tank_shield_refill);
                self.events.push(CombatEvent::ShieldChanged {
                    current: self.shield.current(),
                    max: self.shield.max(),
                });
            }
            (Archetype::Support, SkillSlot::Skill2) => {
                let ratio = self.config.support_atk_buff_ratio;
                let duration = self.config.support_buff_duration_ms;
                for i in 0..self.party.len() {
                    if let Some(m) = self.party.member_mut(i) {
                        let delta = (m.base_stat(BuffStat::Atk) * ratio).floor();
                        m.add_buff(BuffStat::Atk, delta, duration);
                    }
                }
            }
            _ => self.fire_skill(slot),
        }
        true
    }

    fn fire_skill(&mut self, slot: SkillSlot) {
        let member = self.party.active();
        let spec = member.skills.spec(slot);
        if spec.multiplier <= 0.0 {
            return;
        }
        let origin = member.unit.position;
        let Some((_, target)) = self.nearest_enemy(origin, None) else {
            return;
        };

        let hits = match slot {
            SkillSlot::Skill1 => 1,
            SkillSlot::Skill2 => spec.hits.max(1),
        };
        let attack = member.attack_profile((member.unit.atk * spec.multiplier).floor());
        let speed = member.weapon.config.bullet_speed * 1.5;
        let base = origin.angle_to(target);

        for _ in 0..hits {
            let angle = base + (self.rng.unit() - 0.5) * SKILL_SPREAD_RAD;
            self.fire_party_shot(Launch {
                origin,
                angle,
                speed,
                attack,
                flags: ProjectileFlags::PIERCING | ProjectileFlags::SKILL,
                explosion_radius: 0.0,
            });
        }
    }

    /// Fires the active member's ultimate: a piercing fan centred on the
    /// nearest enemy (or straight right with no enemy on the field).
    pub fn use_ult(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let index = self.party.active_index();
        let member = self.party.active_mut();
        if !member.is_alive() || !member.skills.try_use_ult() {
            return false;
        }
        let name = member.skills.ult_spec().name.clone();
        let multiplier = member.skills.ult_spec().multiplier;
        let origin = member.unit.position;
        let atk = (member.unit.atk * multiplier / ULT_BULLETS as f32 * 2.0).floor();
        let attack = member.attack_profile(atk);
        let speed = member.weapon.config.bullet_speed * 2.0;

        self.events.push(CombatEvent::UltUsed {
            member: index,
            name: name.clone(),
        });
        tracing::debug!(member = index, ult = %name, "ultimate used");

        let base = self
            .nearest_enemy(origin, None)
            .map_or(0.0, |(_, target)| origin.angle_to(target));
        let fan = ULT_FAN_DEG.to_radians();
        for i in 0..ULT_BULLETS {
            let offset = (i as f32 / (ULT_BULLETS - 1) as f32 - 0.5) * fan;
            self.fire_party_shot(Launch {
                origin,
                angle: base + offset,
                speed,
                attack,
                flags: ProjectileFlags::PIERCING | ProjectileFlags::ULT,
                explosion_radius: 0.0,
            });
        }
        true
    }

    // ========================================================================
    // Auto-fire
    // ========================================================================

    /// Advances the active member's weapon and fires at the nearest enemy
    /// in range when the weapon is ready.
    pub(super) fn auto_fire(&mut self, dt_ms: u32) {
        let member = self.party.active_mut();
        if !member.is_alive() || !member.weapon.tick(dt_ms) {
            return;
        }
        let origin = member.unit.position;
        let weapon = member.weapon.config;
        let Some((_, target)) = self.nearest_enemy(origin, Some(weapon.range)) else {
            return;
        };

        let member = self.party.active_mut();
        member.weapon.on_fired();
        let attack = member.attack_profile(member.unit.atk);
        let base = origin.angle_to(target);
        let spread = weapon.spread_deg.to_radians();
        let flags = if weapon.piercing {
            ProjectileFlags::PIERCING
        } else {
            ProjectileFlags::empty()
        };

        for _ in 0..weapon.pellets.max(1) {
            let angle = base + (self.rng.unit() - 0.5) * spread;
            self.fire_party_shot(Launch {
                origin,
                angle,
                speed: weapon.bullet_speed,
                attack,
                flags,
                explosion_radius: weapon.explosion_radius,
            });
        }
    }

    fn emit_hp(&mut self, index: usize) {
        if let Some(member) = self.party.member(index) {
            self.events.push(CombatEvent::HpChanged {
                member: index,
                current: member.unit.hp(),
                max: member.unit.max_hp(),
            });
        }
    }
}

fn percent_of(value: u32, ratio: f32) -> u32 {
    (value as f32 * ratio).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::BattleSetup;
    use crate::catalog::{EnemyCatalog, EnemyTemplate, MemberLoadout, MemberStats};
    use crate::config::CombatConfig;
    use crate::rng::FixedRng;
    use crate::skills::SkillSpec;
    use crate::stage::{AreaDefinition, StageDefinition, WaveDefinition, WaveEntry};

    fn member(id: &str, archetype: Archetype) -> MemberLoadout {
        let mut loadout = MemberLoadout::new(
            id,
            archetype,
            MemberStats {
                hp: 1_000,
                shield: 100,
                ..MemberStats::default()
            },
        );
        loadout.skills.skill1 = SkillSpec {
            multiplier: 2.0,
            ..SkillSpec::default()
        };
        loadout.skills.skill2 = SkillSpec {
            multiplier: 1.0,
            hits: 4,
            ..SkillSpec::default()
        };
        loadout
    }

    fn battle(party: Vec<MemberLoadout>) -> Battle<FixedRng> {
        let catalog = EnemyCatalog::new([EnemyTemplate::new("drone", 10_000, 1.0, 0.0, 0.0)]);
        let setup = BattleSetup {
            stage: StageDefinition {
                id: "drill".into(),
                areas: vec![AreaDefinition {
                    waves: vec![WaveDefinition::new([WaveEntry::new("drone", 1)])],
                    ..AreaDefinition::default()
                }],
                ..StageDefinition::default()
            },
            party,
            config: CombatConfig::default(),
        };
        Battle::new(setup, &catalog, FixedRng::constant(0.5)).unwrap()
    }

    #[test]
    fn skill_respects_cooldown() {
        let mut battle = battle(vec![member("a", Archetype::Dps)]);
        assert!(battle.use_skill(SkillSlot::Skill1));
        assert!(!battle.use_skill(SkillSlot::Skill1));
        let used = battle
            .drain_events()
            .iter()
            .filter(|e| matches!(e, CombatEvent::SkillUsed { .. }))
            .count();
        assert_eq!(used, 1);
    }

    #[test]
    fn damage_skill_fires_configured_hits_at_target() {
        let mut battle = battle(vec![member("a", Archetype::Dps)]);
        battle.tick(1_000, &[]);
        let before = battle.player_bullets().active_count();

        assert!(battle.use_skill(SkillSlot::Skill2));
        assert_eq!(battle.player_bullets().active_count(), before + 4);
        let skill_shots = battle
            .player_bullets()
            .iter()
            .filter(|(_, b)| b.flags.contains(ProjectileFlags::SKILL))
            .count();
        assert_eq!(skill_shots, 4);
    }

    #[test]
    fn damage_skill_without_target_still_consumes_cooldown() {
        let mut battle = battle(vec![member("a", Archetype::Dps)]);
        assert!(battle.use_skill(SkillSlot::Skill1));
        assert_eq!(battle.player_bullets().active_count(), 0);
        assert!(!battle.party().active().skills.cooldown(SkillSlot::Skill1).is_ready());
    }

    #[test]
    fn tank_refills_shield() {
        let mut battle = battle(vec![member("a", Archetype::Tank)]);
        battle.damage_member(0, 80, false);
        assert_eq!(battle.shield().current(), 20);
        assert!(battle.use_skill(SkillSlot::Skill2));
        assert_eq!(battle.shield().current(), 100);
    }

    #[test]
    fn medic_heals_party() {
        let mut battle = battle(vec![member("a", Archetype::Medic), member("b", Archetype::Dps)]);
        battle.damage_member(0, 600, false);
        battle.damage_member(1, 300, false);
        assert!(battle.use_skill(SkillSlot::Skill2));
        // 200 of the first hit went into the shield
        assert_eq!(battle.party().member(0).unwrap().unit.hp(), 700);
        assert_eq!(battle.party().member(1).unwrap().unit.hp(), 800);
    }

    #[test]
    fn support_buffs_every_member() {
        let mut battle = battle(vec![member("a", Archetype::Support), member("b", Archetype::Dps)]);
        assert!(battle.use_skill(SkillSlot::Skill2));
        for m in battle.party().members() {
            assert_eq!(m.unit.atk, 120.0);
        }
    }

    fn quick_support(id: &str) -> MemberLoadout {
        let mut loadout = member(id, Archetype::Support);
        loadout.skills.skill2.cooldown_ms = Some(1_000);
        loadout
    }

    #[test]
    fn support_recast_replaces_buff() {
        let mut battle = battle(vec![quick_support("a"), member("b", Archetype::Dps)]);
        assert!(battle.use_skill(SkillSlot::Skill2));
        battle.tick(1_000, &[]);
        assert!(battle.use_skill(SkillSlot::Skill2));
        battle.tick(1_000, &[]);
        assert!(battle.use_skill(SkillSlot::Skill2));

        for m in battle.party().members() {
            assert_eq!(m.unit.atk, 120.0);
            assert_eq!(m.buffs().len(), 1);
            assert_eq!(m.base_stat(BuffStat::Atk), 100.0);
        }
    }

    #[test]
    fn atk_returns_to_base_after_recast_expires() {
        let mut battle = battle(vec![quick_support("a"), member("b", Archetype::Dps)]);
        assert!(battle.use_skill(SkillSlot::Skill2));
        battle.tick(1_000, &[]);
        assert!(battle.use_skill(SkillSlot::Skill2));

        let duration = CombatConfig::default().support_buff_duration_ms;
        battle.tick(duration - 1, &[]);
        assert_eq!(battle.party().active().unit.atk, 120.0);
        battle.tick(1, &[]);

        for m in battle.party().members() {
            assert_eq!(m.unit.atk, 100.0);
            assert!(m.buffs().is_empty());
        }
    }

    #[test]
    fn ult_requires_full_gauge_and_fires_fan() {
        let mut battle = battle(vec![member("a", Archetype::Dps)]);
        assert!(!battle.use_ult());

        battle.party.active_mut().skills.ult_mut().add(1_000);
        assert!(battle.use_ult());
        assert_eq!(battle.player_bullets().active_count(), 12);
        assert_eq!(battle.party().active().skills.ult().current(), 0);

        // floor(100 * 3 / 12 * 2)
        let (_, bullet) = battle.player_bullets().iter().next().unwrap();
        assert_eq!(bullet.attack.atk, 50.0);
        assert!(bullet.is_piercing());
    }

    #[test]
    fn switch_emits_event_and_rejects_invalid() {
        let mut battle = battle(vec![member("a", Archetype::Dps), member("b", Archetype::Medic)]);
        assert!(!battle.switch_character(0));
        assert!(!battle.switch_character(5));
        assert!(battle.switch_character(1));
        let events = battle.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            CombatEvent::CharSwitched { member: 1, id } if id == "b"
        )));
    }

    #[test]
    fn auto_fire_needs_target_in_range() {
        let mut battle = battle(vec![member("a", Archetype::Dps)]);
        // drone spawns far outside pistol range
        battle.tick(1_000, &[]);
        battle.tick(16, &[]);
        assert_eq!(battle.player_bullets().active_count(), 0);
        assert_eq!(battle.party().active().weapon.magazine(), 12);
    }
}
