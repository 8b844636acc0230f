use crate::ai::patterns::Emission;
use crate::config::CombatConfig;
use crate::entity::Combatant;
use crate::rng::CombatRng;
use crate::types::Vec2;

/// Advances one regular enemy by `dt_ms`.
///
/// Movement and the fire timer run independently: the enemy steers toward
/// `target` at its pattern's speed factor, and when the fire timer elapses
/// it returns the pattern's volley and re-arms the timer to
/// `1000 / fire_rate`. Dead or inactive enemies are a no-op. Without a target
/// the enemy stops and its timer is left untouched.
pub fn update_enemy(
    enemy: &mut Combatant,
    target: Option<Vec2>,
    dt_ms: u32,
    config: &CombatConfig,
    rng: &mut impl CombatRng,
) -> Vec<Emission> {
    if !enemy.is_targetable() {
        return Vec::new();
    }

    let Some(target) = target else {
        enemy.unit.velocity = Vec2::ZERO;
        return Vec::new();
    };

    let factor = enemy.pattern.move_factor();
    enemy.unit.velocity = if factor > 0.0 {
        (target - enemy.unit.position).normalized() * (enemy.unit.spd * factor)
    } else {
        Vec2::ZERO
    };

    if !enemy.pattern.fires() {
        return Vec::new();
    }

    enemy.fire_timer_ms -= dt_ms as f32;
    if enemy.fire_timer_ms > 0.0 {
        return Vec::new();
    }

    let volley = enemy
        .pattern
        .volley(&enemy.shooter(), target, config.burst_shot_delay_ms, rng);
    enemy.fire_timer_ms = fire_interval_ms(enemy.fire_rate);
    volley
}

fn fire_interval_ms(fire_rate: f32) -> f32 {
    if fire_rate > 0.0 {
        1000.0 / fire_rate
    } else {
        f32::MAX
    }
}
