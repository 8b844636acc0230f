//! Hands-off input policy for headless runs.

use combat_core::{Battle, SkillSlot, Vec2};

use crate::api::InputPolicy;

/// Fires skills and the ultimate the moment they are ready, keeps the
/// leader at weapon range from the nearest enemy and dodges incoming fire.
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Fraction of weapon range the leader tries to hold.
    pub standoff: f32,
    /// Enemy bullets closer than this trigger a dodge.
    pub dodge_radius: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            standoff: 0.8,
            dodge_radius: 40.0,
        }
    }
}

impl Autopilot {
    fn nearest_enemy(battle: &Battle, from: Vec2) -> Option<Vec2> {
        battle
            .enemies()
            .iter()
            .filter(|(_, e)| e.is_targetable())
            .map(|(_, e)| e.unit.position)
            .min_by(|a, b| from.distance_squared(*a).total_cmp(&from.distance_squared(*b)))
    }

    fn incoming(&self, battle: &Battle, at: Vec2) -> Option<Vec2> {
        let reach = self.dodge_radius * self.dodge_radius;
        battle
            .enemy_bullets()
            .iter()
            .find(|(_, b)| b.position.distance_squared(at) <= reach)
            .map(|(_, b)| b.velocity)
    }
}

impl InputPolicy for Autopilot {
    fn drive(&mut self, battle: &mut Battle) {
        let leader = battle.party().active();
        if !leader.is_alive() {
            return;
        }
        let at = leader.unit.position;
        let range = leader.weapon.config.range;
        let skills_ready = SkillSlot::ALL.map(|slot| leader.skills.cooldown(slot).is_ready());
        let ult_ready = leader.skills.ult().is_ready();
        let can_dodge = leader.dodge_cooldown_ms() == 0;

        if can_dodge && let Some(velocity) = self.incoming(battle, at) {
            // sidestep perpendicular to the shot
            battle.dodge(Vec2::new(-velocity.y, velocity.x));
        }

        let Some(target) = Self::nearest_enemy(battle, at) else {
            battle.steer(Vec2::ZERO);
            return;
        };

        let distance = at.distance(target);
        let steer = if distance > range * self.standoff {
            target - at
        } else if distance < range * self.standoff * 0.5 {
            at - target
        } else {
            Vec2::ZERO
        };
        battle.steer(steer);

        for (slot, ready) in SkillSlot::ALL.into_iter().zip(skills_ready) {
            if ready && battle.use_skill(slot) {
                tracing::trace!(%slot, "autopilot skill");
            }
        }
        if ult_ready && battle.use_ult() {
            tracing::trace!("autopilot ult");
        }
    }
}
