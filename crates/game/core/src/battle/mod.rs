//! Battle orchestration.
//!
//! [`Battle`] owns every piece of combat state and advances it one tick at a
//! time. The host supplies the elapsed time and the overlaps detected by its
//! spatial layer; the battle resolves them into damage, runs the AI, drives
//! wave progression and queues [`CombatEvent`]s for the host to drain.
//!
//! Each tick runs in a fixed order:
//!
//! 1. overlaps, each resolved atomically (shield, HP, death, break, phase)
//! 2. delayed enemy shots that came due
//! 3. the director's pending wave/area step
//! 4. staggered wave spawns that came due
//! 5. party movement and the active member's auto-fire
//! 6. enemy and boss AI
//! 7. integration, releasing projectiles that left the field
//! 8. cooldowns, buffs, dodge and contact timers
//!
//! Once the stage is cleared or the party falls the battle freezes and
//! further ticks are no-ops.

mod actions;
mod collision;
mod outcome;
mod spawn;

pub use collision::Overlap;
pub use outcome::{BattleReport, BattleStatus, grade};

use crate::ai::{
    ActionSchedule, Emission, PatternPlan, ScheduledAction, update_boss, update_enemy,
};
use crate::attribute::Attribute;
use crate::catalog::{EnemyOracle, MemberLoadout};
use crate::combat::{AttackProfile, ShieldLedger};
use crate::config::CombatConfig;
use crate::entity::{Combatant, Launch, Party, Projectile, ProjectileFlags};
use crate::error::SetupError;
use crate::events::{CombatEvent, EventQueue};
use crate::pool::{EntityPool, Handle, PoolPolicy};
use crate::rng::{CombatRng, PcgRng};
use crate::stage::{
    AreaAdvance, DirectorStep, DirectorTiming, StageDefinition, WaveAreaDirector,
};
use crate::types::{Millis, Side, Vec2};

use self::outcome::BattleStats;
use self::spawn::SpawnQueue;

/// Inputs of a battle.
#[derive(Clone, Debug, Default)]
pub struct BattleSetup {
    pub stage: StageDefinition,
    pub party: Vec<MemberLoadout>,
    pub config: CombatConfig,
}

/// A single running battle.
pub struct Battle<R: CombatRng = PcgRng> {
    config: CombatConfig,
    rng: R,
    clock: Millis,
    status: BattleStatus,
    party: Party,
    shield: ShieldLedger,
    enemies: EntityPool<Combatant>,
    player_bullets: EntityPool<Projectile>,
    enemy_bullets: EntityPool<Projectile>,
    director: WaveAreaDirector,
    schedule: ActionSchedule,
    spawns: SpawnQueue,
    events: EventQueue,
    stats: BattleStats,
}

/// Emissions of one AI step, tagged with their owner.
struct OwnedEmissions {
    owner: Handle,
    origin: Vec2,
    attribute: Option<Attribute>,
    heavy: bool,
    emissions: Vec<Emission>,
}

impl<R: CombatRng> Battle<R> {
    /// Resolves the stage against the enemy catalog, forms the party and
    /// schedules the first wave.
    pub fn new(setup: BattleSetup, enemies: &impl EnemyOracle, rng: R) -> Result<Self, SetupError> {
        let BattleSetup {
            stage,
            party,
            config,
        } = setup;

        let stage = stage.resolve(enemies)?;
        let spawn = Vec2::new(config.field_width / 2.0, config.field_height * 0.75);
        let party = Party::new(&party, spawn, &config)?;
        let shield = ShieldLedger::new(party.total_shield());

        let mut director = WaveAreaDirector::new(stage, DirectorTiming::from(&config));
        director.begin(Millis::ZERO);

        tracing::debug!(
            stage = %director.stage().id,
            areas = director.total_areas(),
            members = party.len(),
            shield = shield.max(),
            "battle assembled"
        );

        Ok(Self {
            enemies: EntityPool::new(config.enemy_pool, PoolPolicy::Growable),
            player_bullets: EntityPool::new(config.player_bullet_pool, PoolPolicy::Fixed),
            enemy_bullets: EntityPool::new(config.enemy_bullet_pool, PoolPolicy::Fixed),
            config,
            rng,
            clock: Millis::ZERO,
            status: BattleStatus::Running,
            party,
            shield,
            director,
            schedule: ActionSchedule::new(),
            spawns: SpawnQueue::default(),
            events: EventQueue::new(),
            stats: BattleStats::default(),
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn clock(&self) -> Millis {
        self.clock
    }

    pub fn status(&self) -> BattleStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == BattleStatus::Running
    }

    pub fn party(&self) -> &Party {
        &self.party
    }

    pub fn shield(&self) -> &ShieldLedger {
        &self.shield
    }

    pub fn enemies(&self) -> &EntityPool<Combatant> {
        &self.enemies
    }

    pub fn player_bullets(&self) -> &EntityPool<Projectile> {
        &self.player_bullets
    }

    pub fn enemy_bullets(&self) -> &EntityPool<Projectile> {
        &self.enemy_bullets
    }

    pub fn director(&self) -> &WaveAreaDirector {
        &self.director
    }

    /// Delayed enemy shots not yet fired.
    pub fn scheduled_shots(&self) -> usize {
        self.schedule.len()
    }

    /// Enemies of the current wave still waiting for their spawn slot.
    pub fn pending_spawns(&self) -> usize {
        self.spawns.len()
    }

    /// Takes every event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        self.events.drain()
    }

    /// Final summary, once the battle has ended.
    pub fn report(&self) -> Option<BattleReport> {
        if !self.status.is_finished() {
            return None;
        }
        let stage = self.director.stage();
        Some(BattleReport {
            stage_id: stage.id.clone(),
            status: self.status,
            stars: grade(
                self.status,
                self.stats.party_deaths,
                self.clock.0,
                stage.time_limit_secs,
            ),
            elapsed_ms: self.clock.0,
            total_damage_dealt: self.stats.total_damage_dealt,
            party_deaths: self.stats.party_deaths,
            enemies_defeated: self.director.total_defeated(),
        })
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advances the battle by `dt_ms` after resolving `overlaps`.
    pub fn tick(&mut self, dt_ms: u32, overlaps: &[Overlap]) {
        if !self.is_running() {
            return;
        }
        self.clock = self.clock.after(dt_ms);

        for overlap in overlaps {
            self.resolve_overlap(*overlap);
            if !self.is_running() {
                return;
            }
        }

        self.fire_scheduled_shots();
        self.run_director();
        if !self.is_running() {
            return;
        }
        self.spawn_due_enemies();

        self.party.update_motion(dt_ms, &self.config);
        self.auto_fire(dt_ms);
        self.run_enemy_ai(dt_ms);
        self.integrate(dt_ms);
        self.tick_timers(dt_ms);
    }

    fn fire_scheduled_shots(&mut self) {
        let target = self.party.target_position();
        for ScheduledAction { owner, shot, .. } in self.schedule.drain_due(self.clock) {
            // liveness check on fire replaces cancellation
            let Some(enemy) = self.enemies.get(owner) else {
                continue;
            };
            if !enemy.is_targetable() || enemy.is_broken() {
                continue;
            }
            let origin = enemy.unit.position;
            let Some(angle) = shot.launch_angle(origin, target) else {
                continue;
            };
            let attribute = enemy.unit.attribute;
            let heavy = enemy.is_boss();
            self.fire_enemy_shot(origin, attribute, heavy, angle, shot.speed, shot.atk);
        }
    }

    fn run_director(&mut self) {
        while let Some(step) = self.director.poll(self.clock) {
            match step {
                DirectorStep::StartWave => self.start_wave(),
                DirectorStep::AdvanceArea => self.advance_area(),
            }
            if !self.is_running() {
                return;
            }
        }
    }

    fn start_wave(&mut self) {
        let Some(start) = self.director.start_next_wave() else {
            return;
        };
        self.events.push(CombatEvent::WaveStarted {
            area_index: start.area_index,
            wave_index: start.wave_index,
            total_waves: start.total_waves,
            total_areas: start.total_areas,
        });
        self.spawns
            .enqueue_wave(start.wave, self.clock, self.config.spawn_stagger_ms);
    }

    fn advance_area(&mut self) {
        match self.director.advance_to_next_area(self.clock) {
            Some(AreaAdvance::Started {
                area_index,
                total_areas,
            }) => {
                let area = self.director.current_area().cloned().unwrap_or_default();
                self.events.push(CombatEvent::AreaStarted {
                    area_index,
                    total_areas,
                    name: area.name,
                    theme: area.theme,
                    layout: area.layout,
                });
            }
            Some(AreaAdvance::StageCleared) => {
                self.status = BattleStatus::Cleared;
                self.schedule.clear();
                self.events.push(CombatEvent::StageCleared {
                    elapsed_ms: self.clock.0,
                });
                tracing::debug!(
                    stage = %self.director.stage().id,
                    elapsed_ms = self.clock.0,
                    "stage cleared"
                );
            }
            None => {}
        }
    }

    fn run_enemy_ai(&mut self, dt_ms: u32) {
        let target = self.party.target_position();
        let mut owned = Vec::new();

        for (handle, enemy) in self.enemies.iter_mut() {
            if !enemy.is_targetable() {
                continue;
            }
            let emissions = if enemy.is_boss() {
                let step = update_boss(enemy, target, dt_ms, &self.config, &mut self.rng);
                if step.break_ended {
                    if let Some(ext) = enemy.boss() {
                        self.events.push(CombatEvent::BreakChanged {
                            boss: handle,
                            current: ext.break_gauge.current(),
                            max: ext.break_gauge.max(),
                            is_broken: false,
                        });
                    }
                    self.events.push(CombatEvent::BossBroken {
                        boss: handle,
                        is_broken: false,
                    });
                    tracing::debug!(boss = %enemy.unit.name, "break ended");
                }
                step.pattern
                    .map(|(_, PatternPlan { emissions, .. })| emissions)
                    .unwrap_or_default()
            } else {
                update_enemy(enemy, target, dt_ms, &self.config, &mut self.rng)
            };

            if !emissions.is_empty() {
                owned.push(OwnedEmissions {
                    owner: handle,
                    origin: enemy.unit.position,
                    attribute: enemy.unit.attribute,
                    heavy: enemy.is_boss(),
                    emissions,
                });
            }
        }

        for batch in owned {
            for emission in batch.emissions {
                let shot = emission.shot;
                if emission.delay_ms == 0 {
                    self.fire_enemy_shot(
                        batch.origin,
                        batch.attribute,
                        batch.heavy,
                        shot.angle,
                        shot.speed,
                        shot.atk,
                    );
                } else {
                    self.schedule
                        .push(self.clock.after(emission.delay_ms), batch.owner, shot);
                }
            }
        }
    }

    fn integrate(&mut self, dt_ms: u32) {
        for (_, enemy) in self.enemies.iter_mut() {
            enemy.advance(dt_ms, &self.config);
        }
        for pool in [&mut self.player_bullets, &mut self.enemy_bullets] {
            let mut gone = Vec::new();
            for (handle, bullet) in pool.iter_mut() {
                bullet.advance(dt_ms);
                if self
                    .config
                    .is_out_of_bounds(bullet.position.x, bullet.position.y)
                {
                    gone.push(handle);
                }
            }
            for handle in gone {
                pool.release(handle);
            }
        }
    }

    fn tick_timers(&mut self, dt_ms: u32) {
        self.party.tick_timers(dt_ms);
        for (_, enemy) in self.enemies.iter_mut() {
            enemy.contact_cooldown_ms = enemy.contact_cooldown_ms.saturating_sub(dt_ms);
        }
    }

    // ========================================================================
    // Projectiles
    // ========================================================================

    /// Fires an enemy projectile. Dropped silently when the pool is empty.
    fn fire_enemy_shot(
        &mut self,
        origin: Vec2,
        attribute: Option<Attribute>,
        heavy: bool,
        angle: f32,
        speed: f32,
        atk: f32,
    ) {
        let Some((_, bullet)) = self.enemy_bullets.acquire() else {
            tracing::trace!("enemy bullet pool exhausted, shot dropped");
            return;
        };
        let flags = if heavy {
            ProjectileFlags::HEAVY
        } else {
            ProjectileFlags::empty()
        };
        bullet.fire(
            Side::Enemy,
            Launch {
                origin,
                angle,
                speed,
                attack: AttackProfile {
                    atk,
                    weapon_atk: 0.0,
                    attribute,
                    archetype: None,
                    crit_rate: 0.0,
                    crit_dmg: 100.0,
                },
                flags,
                explosion_radius: 0.0,
            },
        );
    }

    /// Fires a party projectile. Dropped silently when the pool is empty.
    fn fire_party_shot(&mut self, launch: Launch) -> bool {
        let Some((_, bullet)) = self.player_bullets.acquire() else {
            tracing::trace!("player bullet pool exhausted, shot dropped");
            return false;
        };
        bullet.fire(Side::Party, launch);
        true
    }

    /// Nearest targetable enemy to `from`, optionally within `range`.
    fn nearest_enemy(&self, from: Vec2, range: Option<f32>) -> Option<(Handle, Vec2)> {
        let limit = range.map(|r| r * r);
        self.enemies
            .iter()
            .filter(|(_, e)| e.is_targetable())
            .map(|(h, e)| (h, e.unit.position, from.distance_squared(e.unit.position)))
            .filter(|(_, _, d)| limit.is_none_or(|l| *d <= l))
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(h, p, _)| (h, p))
    }

    // ========================================================================
    // Outcome
    // ========================================================================

    fn defeat(&mut self) {
        if !self.is_running() {
            return;
        }
        self.status = BattleStatus::Defeated;
        self.schedule.clear();
        self.events.push(CombatEvent::GameOver {
            elapsed_ms: self.clock.0,
        });
        tracing::debug!(
            stage = %self.director.stage().id,
            elapsed_ms = self.clock.0,
            "party defeated"
        );
    }
}

impl<R: CombatRng> std::fmt::Debug for Battle<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Battle")
            .field("clock", &self.clock)
            .field("status", &self.status)
            .field("area", &self.director.area_index())
            .field("phase", &self.director.phase())
            .field("enemies", &self.enemies.active_count())
            .field("shield", &self.shield)
            .finish_non_exhaustive()
    }
}
