//! Resolution of overlaps reported by the spatial layer.
//!
//! Every overlap is applied atomically: shield, HP, death, break and phase
//! all settle before the next overlap is looked at. Overlaps naming a slot
//! that has since been released, re-acquired or killed are ignored.

use crate::ai::check_phase_transition;
use crate::battle::Battle;
use crate::combat::{AttackProfile, BreakOutcome, break_damage, resolve_damage};
use crate::config::CombatConfig;
use crate::entity::Combatant;
use crate::events::{CombatEvent, DamageTarget, EventQueue};
use crate::pool::Handle;
use crate::rng::CombatRng;
use crate::stage::Progress;
use crate::types::Vec2;

/// Contact reported by the host's collision detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Overlap {
    /// A party projectile touches an enemy.
    PlayerBulletEnemy { bullet: Handle, enemy: Handle },
    /// An enemy projectile touches a party member.
    EnemyBulletPlayer { bullet: Handle, member: usize },
    /// An enemy body touches a party member.
    EnemyContactPlayer { enemy: Handle, member: usize },
}

impl<R: CombatRng> Battle<R> {
    pub(super) fn resolve_overlap(&mut self, overlap: Overlap) {
        match overlap {
            Overlap::PlayerBulletEnemy { bullet, enemy } => self.bullet_hits_enemy(bullet, enemy),
            Overlap::EnemyBulletPlayer { bullet, member } => self.bullet_hits_member(bullet, member),
            Overlap::EnemyContactPlayer { enemy, member } => self.contact_with_member(enemy, member),
        }
    }

    // ========================================================================
    // Party → enemies
    // ========================================================================

    fn bullet_hits_enemy(&mut self, bullet_handle: Handle, enemy_handle: Handle) {
        let Some(impact) = self
            .enemies
            .get(enemy_handle)
            .filter(|e| e.is_targetable())
            .map(|e| e.unit.position)
        else {
            return;
        };
        let Some(bullet) = self.player_bullets.get_mut(bullet_handle) else {
            return;
        };
        if bullet.has_pierced(enemy_handle) {
            return;
        }

        let attack = bullet.attack;
        let radius = bullet.explosion_radius;
        if bullet.is_piercing() {
            bullet.mark_pierced(enemy_handle);
        } else {
            self.player_bullets.release(bullet_handle);
        }

        self.damage_enemy(enemy_handle, &attack);

        if radius > 0.0 {
            let splash: Vec<Handle> = self
                .enemies
                .iter()
                .filter(|(h, e)| {
                    *h != enemy_handle
                        && e.is_targetable()
                        && e.unit.position.distance(impact) <= radius
                })
                .map(|(h, _)| h)
                .collect();
            for handle in splash {
                self.damage_enemy(handle, &attack);
            }
        }
    }

    /// Full damage pipeline against one enemy: break bonus, HP, death,
    /// then break damage and the phase check for a surviving boss.
    fn damage_enemy(&mut self, handle: Handle, attack: &AttackProfile) {
        if !self.is_running() {
            return;
        }
        let Some(enemy) = self.enemies.get_mut(handle) else {
            return;
        };
        if !enemy.is_targetable() {
            return;
        }

        let roll = resolve_damage(
            attack,
            &enemy.unit.defense_profile(),
            1.0,
            &self.config,
            &mut self.rng,
        );
        let mut amount = roll.damage;
        if enemy.is_broken() {
            amount = (amount as f32 * self.config.break_damage_bonus).floor() as u32;
        }

        let killed = enemy.unit.take_damage(amount);
        let position = enemy.unit.position;
        self.stats.total_damage_dealt += u64::from(amount);
        self.events.push(CombatEvent::DamageDealt {
            target: DamageTarget::Enemy(handle),
            amount,
            is_crit: roll.is_crit,
            position,
        });
        tracing::trace!(enemy = %enemy.unit.name, amount, crit = roll.is_crit, "enemy hit");

        if killed {
            self.on_enemy_killed(handle);
            self.charge_ult(self.config.ult_charge_on_deal + self.config.ult_charge_on_kill);
            return;
        }

        if enemy.is_boss() {
            settle_boss_hit(enemy, handle, amount, attack, &self.config, &mut self.events);
        }
        self.charge_ult(self.config.ult_charge_on_deal);
    }

    fn on_enemy_killed(&mut self, handle: Handle) {
        self.enemies.release(handle);

        let Some(report) = self.director.on_enemy_defeated(self.clock) else {
            return;
        };
        self.events.push(CombatEvent::EnemyDefeated {
            enemy: handle,
            remaining: report.remaining,
            total_defeated: report.total_defeated,
        });
        match report.progress {
            Some(Progress::WaveCleared {
                wave_index,
                total_waves,
            }) => self.events.push(CombatEvent::WaveCleared {
                wave_index,
                total_waves,
            }),
            Some(Progress::AreaCleared {
                area_index,
                total_areas,
            }) => self.events.push(CombatEvent::AreaCleared {
                area_index,
                total_areas,
            }),
            None => {}
        }
    }

    fn charge_ult(&mut self, amount: u32) {
        let active = self.party.active_mut();
        if active.is_alive() {
            active.skills.ult_mut().add(amount);
        }
    }

    // ========================================================================
    // Enemies → party
    // ========================================================================

    fn bullet_hits_member(&mut self, bullet_handle: Handle, member: usize) {
        let Some(defense) = self
            .party
            .member(member)
            .filter(|m| m.is_alive())
            .map(|m| m.unit.defense_profile())
        else {
            return;
        };
        let Some(bullet) = self.enemy_bullets.get(bullet_handle) else {
            return;
        };
        let attack = bullet.attack;
        self.enemy_bullets.release(bullet_handle);

        if self.party.member(member).is_some_and(|m| m.is_invulnerable()) {
            return;
        }

        let roll = resolve_damage(&attack, &defense, 1.0, &self.config, &mut self.rng);
        self.damage_member(member, roll.damage, roll.is_crit);
    }

    fn contact_with_member(&mut self, enemy_handle: Handle, member: usize) {
        if !self
            .party
            .member(member)
            .is_some_and(|m| m.is_alive() && !m.is_invulnerable())
        {
            return;
        }
        let Some(enemy) = self.enemies.get_mut(enemy_handle) else {
            return;
        };
        if !enemy.is_targetable()
            || !enemy.pattern.deals_contact_damage()
            || enemy.contact_cooldown_ms > 0
        {
            return;
        }
        enemy.contact_cooldown_ms = self.config.contact_cooldown_ms;
        let amount = enemy.unit.atk.max(0.0) as u32;
        self.damage_member(member, amount, false);
    }

    /// Routes damage through the party shield, then the member's HP.
    pub(super) fn damage_member(&mut self, index: usize, amount: u32, is_crit: bool) {
        // a harmless touch is not a hit received
        if amount == 0 {
            return;
        }
        let absorb = self.shield.apply_damage(amount);
        if absorb.absorbed > 0 {
            self.events.push(CombatEvent::ShieldChanged {
                current: self.shield.current(),
                max: self.shield.max(),
            });
        }
        self.charge_ult(self.config.ult_charge_on_receive);
        if absorb.remaining == 0 {
            return;
        }

        let Some(member) = self.party.member_mut(index) else {
            return;
        };
        let killed = member.unit.take_damage(absorb.remaining);
        self.events.push(CombatEvent::DamageDealt {
            target: DamageTarget::Member(index),
            amount: absorb.remaining,
            is_crit,
            position: member.unit.position,
        });
        self.events.push(CombatEvent::HpChanged {
            member: index,
            current: member.unit.hp(),
            max: member.unit.max_hp(),
        });

        if killed {
            self.on_member_down(index);
        }
    }

    fn on_member_down(&mut self, index: usize) {
        self.stats.party_deaths += 1;
        self.events.push(CombatEvent::MemberDown { member: index });
        tracing::debug!(member = index, "party member down");

        if index == self.party.active_index()
            && let Some(next) = self.party.next_alive()
        {
            self.switch_character(next);
        }
        if self.party.all_dead() {
            self.defeat();
        }
    }
}

/// Break damage and phase check for a boss that survived a hit.
fn settle_boss_hit(
    boss: &mut Combatant,
    handle: Handle,
    amount: u32,
    attack: &AttackProfile,
    config: &CombatConfig,
    events: &mut EventQueue,
) {
    let hp_ratio = boss.unit.hp_ratio();
    let mut broke = false;
    let Some(ext) = boss.boss_mut() else {
        return;
    };

    if !ext.break_gauge.is_broken() {
        let amount = break_damage(amount, attack.archetype, config);
        match ext
            .break_gauge
            .apply_break_damage(amount, config.break_duration_ms)
        {
            BreakOutcome::Ignored => {}
            BreakOutcome::Drained { current } => events.push(CombatEvent::BreakChanged {
                boss: handle,
                current,
                max: ext.break_gauge.max(),
                is_broken: false,
            }),
            BreakOutcome::Broke => {
                broke = true;
                ext.charge = None;
                events.push(CombatEvent::BreakChanged {
                    boss: handle,
                    current: 0,
                    max: ext.break_gauge.max(),
                    is_broken: true,
                });
                events.push(CombatEvent::BossBroken {
                    boss: handle,
                    is_broken: true,
                });
            }
        }
    }

    let phase = check_phase_transition(ext, hp_ratio, config.boss_phase_threshold);
    if let Some(phase) = phase {
        events.push(CombatEvent::BossPhaseChanged {
            boss: handle,
            phase,
        });
        tracing::debug!(boss = %boss.unit.name, phase, "boss phase changed");
    }
    if broke {
        boss.unit.velocity = Vec2::ZERO;
        tracing::debug!(boss = %boss.unit.name, "boss broken");
    }
}
