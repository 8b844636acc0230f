use std::collections::VecDeque;

use crate::battle::Battle;
use crate::catalog::EnemyTemplate;
use crate::config::CombatConfig;
use crate::events::CombatEvent;
use crate::rng::CombatRng;
use crate::stage::ResolvedWave;
use crate::types::{Millis, Vec2};

#[derive(Clone, Debug)]
struct PendingSpawn {
    at: Millis,
    template: EnemyTemplate,
}

/// Staggered spawns of the active wave, in due order.
#[derive(Clone, Debug, Default)]
pub(crate) struct SpawnQueue {
    pending: VecDeque<PendingSpawn>,
}

impl SpawnQueue {
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Queues every enemy of `wave`, the n-th one `n × stagger_ms` after `now`.
    pub fn enqueue_wave(&mut self, wave: &ResolvedWave, now: Millis, stagger_ms: u32) {
        let mut slot = 0u32;
        for entry in &wave.spawns {
            for _ in 0..entry.count {
                self.pending.push_back(PendingSpawn {
                    at: now.after(slot.saturating_mul(stagger_ms)),
                    template: entry.template.clone(),
                });
                slot += 1;
            }
        }
    }

    pub fn pop_due(&mut self, now: Millis) -> Option<EnemyTemplate> {
        if self.pending.front().is_some_and(|p| p.at <= now) {
            self.pending.pop_front().map(|p| p.template)
        } else {
            None
        }
    }
}

/// Random point on one of the four field edges, `spawn_edge_margin` inside.
pub(crate) fn edge_position(config: &CombatConfig, rng: &mut impl CombatRng) -> Vec2 {
    let m = config.spawn_edge_margin;
    let (w, h) = (config.field_width, config.field_height);
    match rng.below(4) {
        0 => Vec2::new(rng.range(m, w - m), m),
        1 => Vec2::new(w - m, rng.range(m, h - m)),
        2 => Vec2::new(rng.range(m, w - m), h - m),
        _ => Vec2::new(m, rng.range(m, h - m)),
    }
}

impl<R: CombatRng> Battle<R> {
    pub(super) fn spawn_due_enemies(&mut self) {
        while let Some(template) = self.spawns.pop_due(self.clock) {
            let position = edge_position(&self.config, &mut self.rng);
            let Some((handle, enemy)) = self.enemies.acquire() else {
                continue;
            };
            enemy.spawn(&template, position, &self.config, &mut self.rng);

            if let Some(ext) = enemy.boss() {
                self.events.push(CombatEvent::BossSpawned {
                    boss: handle,
                    name: enemy.unit.name.clone(),
                    max_hp: enemy.unit.max_hp(),
                    break_gauge: ext.break_gauge.max(),
                });
                tracing::debug!(boss = %template.id, "boss spawned");
            } else {
                tracing::trace!(enemy = %template.id, %position, "enemy spawned");
            }
        }
    }
}
