use arrayvec::ArrayVec;

use crate::catalog::MemberLoadout;
use crate::combat::AttackProfile;
use crate::config::CombatConfig;
use crate::entity::unit::{CombatUnit, UnitStats};
use crate::entity::weapon::WeaponState;
use crate::error::SetupError;
use crate::skills::SkillBook;
use crate::types::Vec2;

// ============================================================================
// Buffs
// ============================================================================

/// Stat touched by a timed buff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BuffStat {
    Atk,
    Def,
}

/// Flat stat delta reverted when its duration elapses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedBuff {
    pub stat: BuffStat,
    pub delta: f32,
    pub remaining_ms: u32,
}

// ============================================================================
// Dodge
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct DodgeState {
    cooldown_ms: u32,
    remaining_ms: u32,
    direction: Vec2,
}

// ============================================================================
// PartyMember
// ============================================================================

/// A fielded character.
#[derive(Clone, Debug)]
pub struct PartyMember {
    pub id: String,
    pub unit: CombatUnit,
    pub weapon: WeaponState,
    pub weapon_atk: f32,
    /// This member's contribution to the party shield.
    pub shield_stat: u32,
    pub skills: SkillBook,
    buffs: ArrayVec<TimedBuff, { CombatConfig::MAX_BUFFS }>,
    dodge: DodgeState,
}

impl PartyMember {
    pub fn from_loadout(loadout: &MemberLoadout, position: Vec2, config: &CombatConfig) -> Self {
        let stats = &loadout.stats;
        Self {
            id: loadout.id.clone(),
            unit: CombatUnit::new(
                loadout.display_name(),
                loadout.attribute,
                Some(loadout.archetype),
                UnitStats {
                    max_hp: stats.hp,
                    atk: stats.atk,
                    def: stats.def,
                    spd: stats.spd,
                    crit_rate: stats.crit_rate,
                    crit_dmg: stats.crit_dmg,
                },
                position,
            ),
            weapon: WeaponState::new(loadout.weapon),
            weapon_atk: stats.weapon_atk,
            shield_stat: stats.shield,
            skills: SkillBook::new(loadout.skills.clone(), config),
            buffs: ArrayVec::new(),
            dodge: DodgeState::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.unit.is_alive()
    }

    /// Offensive snapshot for a projectile with the given base attack.
    pub fn attack_profile(&self, atk: f32) -> AttackProfile {
        self.unit.attack_profile(atk, self.weapon_atk)
    }

    // ===== buffs =====

    pub fn buffs(&self) -> &[TimedBuff] {
        &self.buffs
    }

    /// Applies a flat buff. A buff on the same stat replaces the previous
    /// one (its delta is reverted first). Returns false if dead.
    pub fn add_buff(&mut self, stat: BuffStat, delta: f32, duration_ms: u32) -> bool {
        if !self.is_alive() {
            return false;
        }
        if let Some(index) = self.buffs.iter().position(|b| b.stat == stat) {
            let old = self.buffs.remove(index);
            self.apply_delta(old.stat, -old.delta);
        }
        let buff = TimedBuff {
            stat,
            delta,
            remaining_ms: duration_ms,
        };
        if self.buffs.try_push(buff).is_err() {
            return false;
        }
        self.apply_delta(stat, delta);
        true
    }

    /// Current value of `stat` without any active buff on it.
    pub fn base_stat(&self, stat: BuffStat) -> f32 {
        let buffed: f32 = self
            .buffs
            .iter()
            .filter(|b| b.stat == stat)
            .map(|b| b.delta)
            .sum();
        let current = match stat {
            BuffStat::Atk => self.unit.atk,
            BuffStat::Def => self.unit.def,
        };
        current - buffed
    }

    fn apply_delta(&mut self, stat: BuffStat, delta: f32) {
        match stat {
            BuffStat::Atk => self.unit.atk += delta,
            BuffStat::Def => self.unit.def += delta,
        }
    }

    fn tick_buffs(&mut self, dt_ms: u32) {
        let mut i = 0;
        while i < self.buffs.len() {
            let buff = &mut self.buffs[i];
            buff.remaining_ms = buff.remaining_ms.saturating_sub(dt_ms);
            if buff.remaining_ms == 0 {
                let expired = self.buffs.remove(i);
                self.apply_delta(expired.stat, -expired.delta);
            } else {
                i += 1;
            }
        }
    }

    // ===== dodge =====

    pub fn is_dodging(&self) -> bool {
        self.dodge.remaining_ms > 0
    }

    /// Damage from bullets and contact is ignored while dodging.
    pub fn is_invulnerable(&self) -> bool {
        self.is_dodging()
    }

    pub fn dodge_cooldown_ms(&self) -> u32 {
        self.dodge.cooldown_ms
    }

    /// Starts a dodge toward `direction` (upward when zero).
    pub fn dodge(&mut self, direction: Vec2, config: &CombatConfig) -> bool {
        if !self.is_alive() || self.is_dodging() || self.dodge.cooldown_ms > 0 {
            return false;
        }
        let mut direction = direction.normalized();
        if direction == Vec2::ZERO {
            direction = Vec2::new(0.0, -1.0);
        }
        self.dodge = DodgeState {
            cooldown_ms: config.dodge_cooldown_ms,
            remaining_ms: config.dodge_duration_ms,
            direction,
        };
        true
    }

    /// Advances skill cooldowns, buffs and dodge timers.
    pub fn tick_timers(&mut self, dt_ms: u32) {
        self.skills.tick(dt_ms);
        self.tick_buffs(dt_ms);
        self.dodge.cooldown_ms = self.dodge.cooldown_ms.saturating_sub(dt_ms);
        self.dodge.remaining_ms = self.dodge.remaining_ms.saturating_sub(dt_ms);
    }
}

// ============================================================================
// Party
// ============================================================================

/// One to three members, exactly one of them active.
#[derive(Clone, Debug)]
pub struct Party {
    members: ArrayVec<PartyMember, { CombatConfig::MAX_PARTY }>,
    active: usize,
    steer: Vec2,
}

impl Party {
    /// Forms the party with member 0 active at `spawn`.
    pub fn new(
        loadouts: &[MemberLoadout],
        spawn: Vec2,
        config: &CombatConfig,
    ) -> Result<Self, SetupError> {
        if loadouts.is_empty() {
            return Err(SetupError::EmptyParty);
        }
        if loadouts.len() > CombatConfig::MAX_PARTY {
            return Err(SetupError::PartyTooLarge {
                count: loadouts.len(),
                max: CombatConfig::MAX_PARTY,
            });
        }

        let mut members = ArrayVec::new();
        for (i, loadout) in loadouts.iter().enumerate() {
            if loadout.stats.hp == 0 {
                return Err(SetupError::InvalidMemberHp {
                    member: loadout.id.clone(),
                });
            }
            let position = spawn + formation_offset(i, 0);
            members.push(PartyMember::from_loadout(loadout, position, config));
        }

        Ok(Self {
            members,
            active: 0,
            steer: Vec2::ZERO,
        })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[PartyMember] {
        &self.members
    }

    pub fn member(&self, index: usize) -> Option<&PartyMember> {
        self.members.get(index)
    }

    pub fn member_mut(&mut self, index: usize) -> Option<&mut PartyMember> {
        self.members.get_mut(index)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &PartyMember {
        &self.members[self.active]
    }

    pub fn active_mut(&mut self) -> &mut PartyMember {
        &mut self.members[self.active]
    }

    /// Position of the active member if it is alive.
    pub fn target_position(&self) -> Option<Vec2> {
        let active = self.active();
        active.is_alive().then_some(active.unit.position)
    }

    /// Sum of every member's shield stat.
    pub fn total_shield(&self) -> u32 {
        self.members.iter().map(|m| m.shield_stat).sum()
    }

    pub fn all_dead(&self) -> bool {
        self.members.iter().all(|m| !m.is_alive())
    }

    /// First living member other than the active one.
    pub fn next_alive(&self) -> Option<usize> {
        self.members
            .iter()
            .enumerate()
            .position(|(i, m)| i != self.active && m.is_alive())
    }

    /// Makes `index` the active member and snaps the others into formation.
    /// Fails without side effects when out of range, already active, or dead.
    pub fn switch_to(&mut self, index: usize) -> bool {
        match self.members.get(index) {
            Some(member) if index != self.active && member.is_alive() => {}
            _ => return false,
        }

        self.active = index;
        let anchor = self.members[index].unit.position;
        for (i, member) in self.members.iter_mut().enumerate() {
            if i != index && member.is_alive() {
                member.unit.position = anchor + formation_offset(i, index);
            }
        }
        true
    }

    /// Movement input for the active member (normalized internally).
    pub fn set_steer(&mut self, direction: Vec2) {
        self.steer = direction.normalized();
    }

    /// Moves the active member by its steering or dodge velocity and eases
    /// followers toward their formation slots.
    pub fn update_motion(&mut self, dt_ms: u32, config: &CombatConfig) {
        let active = self.active;
        let steer = self.steer;
        let dt = dt_ms as f32 / 1000.0;

        let leader = &mut self.members[active];
        if leader.is_alive() {
            leader.unit.velocity = if leader.is_dodging() {
                leader.dodge.direction * (leader.unit.spd * config.dodge_speed_factor)
            } else {
                steer * leader.unit.spd
            };
            let unit = &mut leader.unit;
            unit.position += unit.velocity * dt;
            unit.position.x = unit.position.x.clamp(0.0, config.field_width);
            unit.position.y = unit.position.y.clamp(0.0, config.field_height);
        } else {
            leader.unit.velocity = Vec2::ZERO;
            return;
        }

        let anchor = self.members[active].unit.position;
        for (i, member) in self.members.iter_mut().enumerate() {
            if i == active || !member.is_alive() {
                continue;
            }
            let slot = anchor + formation_offset(i, active);
            member.unit.position = member.unit.position.lerp(slot, FOLLOW_LERP);
        }
    }

    pub fn tick_timers(&mut self, dt_ms: u32) {
        for member in &mut self.members {
            member.tick_timers(dt_ms);
        }
    }
}

/// Fraction of the remaining distance a follower closes each tick.
const FOLLOW_LERP: f32 = 0.05;

/// Formation slot of member `index` relative to the active member.
fn formation_offset(index: usize, active: usize) -> Vec2 {
    if index == active {
        return Vec2::ZERO;
    }
    Vec2::new((index as f32 - active as f32) * 40.0, 30.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Archetype;
    use crate::catalog::MemberStats;

    fn loadout(id: &str, hp: u32) -> MemberLoadout {
        MemberLoadout::new(
            id,
            Archetype::Dps,
            MemberStats {
                hp,
                shield: 100,
                ..MemberStats::default()
            },
        )
    }

    fn party(n: usize) -> Party {
        let loadouts: Vec<_> = (0..n).map(|i| loadout(&format!("m{i}"), 500)).collect();
        Party::new(&loadouts, Vec2::new(600.0, 450.0), &CombatConfig::default()).unwrap()
    }

    #[test]
    fn formation_rejects_bad_input() {
        let config = CombatConfig::default();
        assert_eq!(
            Party::new(&[], Vec2::ZERO, &config).unwrap_err(),
            SetupError::EmptyParty
        );
        let four: Vec<_> = (0..4).map(|i| loadout(&format!("m{i}"), 10)).collect();
        assert!(matches!(
            Party::new(&four, Vec2::ZERO, &config),
            Err(SetupError::PartyTooLarge { count: 4, max: 3 })
        ));
        assert!(matches!(
            Party::new(&[loadout("ghost", 0)], Vec2::ZERO, &config),
            Err(SetupError::InvalidMemberHp { .. })
        ));
    }

    #[test]
    fn shield_pool_sums_members() {
        assert_eq!(party(3).total_shield(), 300);
    }

    #[test]
    fn switch_rules() {
        let mut p = party(3);
        assert!(!p.switch_to(0), "already active");
        assert!(!p.switch_to(7), "out of range");

        p.member_mut(2).unwrap().unit.take_damage(10_000);
        assert!(!p.switch_to(2), "dead");

        assert!(p.switch_to(1));
        assert_eq!(p.active_index(), 1);
        let anchor = p.active().unit.position;
        assert_eq!(p.member(0).unwrap().unit.position, anchor + Vec2::new(-40.0, 30.0));
    }

    #[test]
    fn next_alive_skips_active_and_dead() {
        let mut p = party(3);
        p.member_mut(1).unwrap().unit.take_damage(10_000);
        assert_eq!(p.next_alive(), Some(2));
        p.member_mut(2).unwrap().unit.take_damage(10_000);
        assert_eq!(p.next_alive(), None);
        assert!(!p.all_dead());
    }

    #[test]
    fn buffs_apply_and_revert() {
        let mut p = party(1);
        let member = p.active_mut();
        let base = member.unit.atk;

        assert!(member.add_buff(BuffStat::Atk, 20.0, 1_000));
        assert_eq!(member.unit.atk, base + 20.0);

        // refresh replaces, never stacks
        assert!(member.add_buff(BuffStat::Atk, 30.0, 1_000));
        assert_eq!(member.unit.atk, base + 30.0);
        assert_eq!(member.buffs().len(), 1);
        assert_eq!(member.base_stat(BuffStat::Atk), base);
        assert_eq!(member.base_stat(BuffStat::Def), member.unit.def);

        member.tick_timers(999);
        assert_eq!(member.unit.atk, base + 30.0);
        member.tick_timers(1);
        assert_eq!(member.unit.atk, base);
        assert!(member.buffs().is_empty());
    }

    #[test]
    fn dodge_grants_invulnerability_then_cools_down() {
        let config = CombatConfig::default();
        let mut p = party(1);
        let member = p.active_mut();

        assert!(member.dodge(Vec2::new(1.0, 0.0), &config));
        assert!(member.is_invulnerable());
        assert!(!member.dodge(Vec2::new(1.0, 0.0), &config));

        member.tick_timers(300);
        assert!(!member.is_invulnerable());
        assert!(!member.dodge(Vec2::ZERO, &config));

        member.tick_timers(2_700);
        assert!(member.dodge(Vec2::ZERO, &config));
    }

    #[test]
    fn followers_ease_toward_formation() {
        let config = CombatConfig::default();
        let mut p = party(2);
        p.member_mut(1).unwrap().unit.position = Vec2::new(0.0, 0.0);

        let before = p.member(1).unwrap().unit.position;
        p.update_motion(16, &config);
        let after = p.member(1).unwrap().unit.position;
        let slot = p.active().unit.position + Vec2::new(40.0, 30.0);
        assert!(after.distance(slot) < before.distance(slot));
    }
}
