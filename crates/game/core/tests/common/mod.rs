#![allow(dead_code)]

use combat_core::{
    Archetype, Battle, BattleSetup, CombatConfig, CombatEvent, CombatRng, EnemyCatalog,
    EnemyTemplate, MemberLoadout, MemberStats, Overlap, SkillSpec, StageDefinition,
};

/// Spawns everything on the bottom edge (close to the party) and never
/// rolls crits or jitter away from 1.0.
pub struct BottomEdgeRng;

impl CombatRng for BottomEdgeRng {
    fn next_u32(&mut self) -> u32 {
        2
    }

    fn unit(&mut self) -> f32 {
        0.5
    }
}

/// Enemy that neither moves nor shoots.
pub fn dummy(id: &str, hp: u32) -> EnemyTemplate {
    let mut template = EnemyTemplate::new(id, hp, 10.0, 0.0, 0.0);
    template.attack_pattern = "chase_contact".into();
    template
}

pub fn gunner(id: &str) -> MemberLoadout {
    let mut loadout = MemberLoadout::new(
        id,
        Archetype::Dps,
        MemberStats {
            hp: 1_000,
            crit_rate: 0.0,
            ..MemberStats::default()
        },
    );
    loadout.skills.skill2 = SkillSpec {
        multiplier: 1.0,
        hits: 10,
        ..SkillSpec::default()
    };
    loadout
}

pub fn setup(stage: StageDefinition, party: Vec<MemberLoadout>) -> BattleSetup {
    BattleSetup {
        stage,
        party,
        config: CombatConfig::default(),
    }
}

pub fn build<R: CombatRng>(
    stage: StageDefinition,
    party: Vec<MemberLoadout>,
    catalog: &EnemyCatalog,
    rng: R,
) -> Battle<R> {
    Battle::new(setup(stage, party), catalog, rng).expect("valid setup")
}

/// Every party bullet paired with every enemy within `reach`.
pub fn bullet_overlaps<R: CombatRng>(battle: &Battle<R>, reach: f32) -> Vec<Overlap> {
    let mut overlaps = Vec::new();
    for (bullet, b) in battle.player_bullets().iter() {
        for (enemy, e) in battle.enemies().iter() {
            if b.position.distance(e.unit.position) <= reach {
                overlaps.push(Overlap::PlayerBulletEnemy { bullet, enemy });
            }
        }
    }
    overlaps
}

/// Runs until the battle ends, feeding bullet overlaps every tick.
pub fn run_with_overlaps<R: CombatRng>(
    battle: &mut Battle<R>,
    max_ticks: u32,
) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        let overlaps = bullet_overlaps(battle, 30.0);
        battle.tick(16, &overlaps);
        events.extend(battle.drain_events());
        if !battle.is_running() {
            break;
        }
    }
    events
}
