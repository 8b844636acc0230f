use crate::ai::patterns::{BossPattern, PatternPlan, phase_patterns};
use crate::config::CombatConfig;
use crate::entity::{BossExtension, Combatant, CombatantKind};
use crate::rng::CombatRng;
use crate::types::Vec2;

/// Result of one boss AI step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BossStep {
    /// Pattern chosen this step, with its emission plan.
    pub pattern: Option<(BossPattern, PatternPlan)>,
    /// The break stun expired during this step.
    pub break_ended: bool,
}

/// Advances one boss by `dt_ms`.
///
/// While broken the boss only counts down its stun: velocity stays zero and
/// no pattern runs. Otherwise the pattern timer picks the next pattern of the
/// current phase round-robin and re-arms itself to the base interval plus
/// a random jitter, and the boss drifts toward the target at a reduced
/// speed (or dashes, while a charge pattern is in progress).
pub fn update_boss(
    boss: &mut Combatant,
    target: Option<Vec2>,
    dt_ms: u32,
    config: &CombatConfig,
    rng: &mut impl CombatRng,
) -> BossStep {
    let mut step = BossStep::default();
    if !boss.is_targetable() {
        return step;
    }

    let shooter = boss.shooter();
    let Combatant { unit, kind, .. } = boss;
    let CombatantKind::Boss(ext) = kind else {
        return step;
    };

    if ext.break_gauge.is_broken() {
        unit.velocity = Vec2::ZERO;
        step.break_ended = ext.break_gauge.tick(dt_ms);
        return step;
    }

    tick_charge(ext, dt_ms);

    let Some(target) = target else {
        unit.velocity = ext.charge.map_or(Vec2::ZERO, |c| c.velocity);
        return step;
    };

    ext.pattern_timer_ms -= dt_ms as f32;
    if ext.pattern_timer_ms <= 0.0 {
        let patterns = phase_patterns(ext.phase);
        let pattern = patterns[ext.pattern_cursor % patterns.len()];
        ext.pattern_cursor += 1;

        let plan = pattern.plan(&shooter, target);
        if let Some(charge) = plan.charge {
            ext.charge = Some(charge.into());
        }
        ext.pattern_timer_ms = config.boss_pattern_interval_ms as f32
            + rng.unit() * config.boss_pattern_jitter_ms as f32;

        tracing::trace!(%pattern, phase = ext.phase, "boss pattern");
        step.pattern = Some((pattern, plan));
    }

    unit.velocity = match ext.charge {
        Some(charge) => charge.velocity,
        None => (target - unit.position).normalized() * (unit.spd * config.boss_chase_factor),
    };

    step
}

fn tick_charge(ext: &mut BossExtension, dt_ms: u32) {
    let expired = match &mut ext.charge {
        Some(charge) if charge.remaining_ms > dt_ms => {
            charge.remaining_ms -= dt_ms;
            false
        }
        Some(_) => true,
        None => false,
    };
    if expired {
        ext.charge = None;
    }
}

/// Irreversible phase advance, evaluated after every damage application.
///
/// Returns the new phase when the boss crosses the HP threshold while still
/// in phase 1. The pattern cursor restarts at the head of the new list.
pub fn check_phase_transition(ext: &mut BossExtension, hp_ratio: f32, threshold: f32) -> Option<u8> {
    if ext.phase == 1 && hp_ratio <= threshold {
        ext.phase = 2;
        ext.pattern_cursor = 0;
        return Some(ext.phase);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EnemyCategory, EnemyTemplate};
    use crate::rng::FixedRng;

    fn spawn_boss() -> Combatant {
        let config = CombatConfig::default();
        let mut template = EnemyTemplate::new("overlord", 1000, 50.0, 0.0, 100.0);
        template.category = EnemyCategory::Boss;
        template.break_gauge = 100;

        let mut boss = Combatant::default();
        boss.spawn(&template, Vec2::new(600.0, 200.0), &config, &mut FixedRng::constant(0.0));
        boss
    }

    fn run(boss: &mut Combatant, dt: u32) -> BossStep {
        let config = CombatConfig::default();
        let mut rng = FixedRng::constant(0.0);
        update_boss(boss, Some(Vec2::new(600.0, 700.0)), dt, &config, &mut rng)
    }

    #[test]
    fn patterns_rotate_round_robin() {
        let mut boss = spawn_boss();
        let mut seen = Vec::new();
        for _ in 0..4 {
            let step = run(&mut boss, 2_000);
            seen.push(step.pattern.map(|(p, _)| p));
        }
        assert_eq!(
            seen,
            vec![
                Some(BossPattern::SpreadShot),
                Some(BossPattern::AimedShot),
                Some(BossPattern::LaserSweep),
                Some(BossPattern::SpreadShot),
            ]
        );
    }

    #[test]
    fn boss_chases_at_reduced_speed() {
        let mut boss = spawn_boss();
        run(&mut boss, 16);
        assert!((boss.unit.velocity.y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn broken_boss_is_frozen_until_stun_expires() {
        let mut boss = spawn_boss();
        boss.boss_mut().unwrap().break_gauge.apply_break_damage(100, 5_000);
        boss.unit.velocity = Vec2::new(10.0, 0.0);

        let step = run(&mut boss, 4_000);
        assert!(step.pattern.is_none());
        assert!(!step.break_ended);
        assert_eq!(boss.unit.velocity, Vec2::ZERO);
        // the pattern timer did not advance while broken
        assert_eq!(boss.boss().unwrap().pattern_timer_ms, 2_000.0);

        let step = run(&mut boss, 1_000);
        assert!(step.break_ended);
        assert!(!boss.is_broken());
    }

    #[test]
    fn phase_transition_is_one_way() {
        let mut boss = spawn_boss();
        let ext = boss.boss_mut().unwrap();
        ext.pattern_cursor = 5;

        assert_eq!(check_phase_transition(ext, 0.8, 0.5), None);
        assert_eq!(check_phase_transition(ext, 0.5, 0.5), Some(2));
        assert_eq!(ext.pattern_cursor, 0);
        assert_eq!(check_phase_transition(ext, 0.1, 0.5), None);
        assert_eq!(check_phase_transition(ext, 1.0, 0.5), None);
        assert_eq!(ext.phase, 2);
    }

    #[test]
    fn charge_attack_overrides_chase_then_ends() {
        let mut boss = spawn_boss();
        {
            let ext = boss.boss_mut().unwrap();
            ext.phase = 2;
            ext.pattern_cursor = 2;
        }

        let step = run(&mut boss, 2_000);
        assert_eq!(step.pattern.map(|(p, _)| p), Some(BossPattern::ChargeAttack));
        assert!((boss.unit.velocity.y - 300.0).abs() < 1e-3);

        run(&mut boss, 300);
        assert!((boss.unit.velocity.y - 300.0).abs() < 1e-3);

        run(&mut boss, 200);
        assert!((boss.unit.velocity.y - 50.0).abs() < 1e-3);
    }
}
