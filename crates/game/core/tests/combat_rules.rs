mod common;

use combat_core::{
    AreaDefinition, BattleStatus, CombatConfig, CombatEvent, DamageTarget, EnemyCatalog,
    EnemyCategory, EnemyTemplate, FixedRng, Overlap, SkillSlot, StageDefinition, UltGauge,
    WaveDefinition, WaveEntry,
};

use common::{build, dummy, gunner};

fn single_enemy_stage(enemy: &str) -> StageDefinition {
    StageDefinition {
        id: "test".into(),
        name: "Test".into(),
        time_limit_secs: 0,
        areas: vec![AreaDefinition {
            name: "arena".into(),
            waves: vec![WaveDefinition::new([WaveEntry::new(enemy, 1)])],
            ..AreaDefinition::default()
        }],
    }
}

fn volley(battle: &combat_core::Battle<FixedRng>) -> Vec<Overlap> {
    let (enemy, _) = battle.enemies().iter().next().expect("enemy spawned");
    battle
        .player_bullets()
        .iter()
        .map(|(bullet, _)| Overlap::PlayerBulletEnemy { bullet, enemy })
        .collect()
}

#[test]
fn ult_gauge_counts_hits_and_kill() {
    let catalog = EnemyCatalog::new([dummy("drone", 1_000)]);
    let mut battle = build(
        single_enemy_stage("drone"),
        vec![gunner("vanguard")],
        &catalog,
        FixedRng::constant(0.5),
    );

    battle.tick(1_000, &[]);
    assert_eq!(battle.enemies().active_count(), 1);
    assert!(battle.use_skill(SkillSlot::Skill2));
    assert_eq!(battle.player_bullets().active_count(), 10);

    let overlaps = volley(&battle);
    battle.tick(16, &overlaps);

    // nine hits at 8, the killing hit at 8 + 50
    assert_eq!(battle.party().active().skills.ult().current(), 130);
    assert_eq!(battle.status(), BattleStatus::Cleared);

    let hits: Vec<u32> = battle
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            CombatEvent::DamageDealt {
                target: DamageTarget::Enemy(_),
                amount,
                ..
            } => Some(amount),
            _ => None,
        })
        .collect();
    assert_eq!(hits, vec![100; 10]);
}

#[test]
fn ult_gauge_clamps_and_gates_use() {
    let mut gauge = UltGauge::new(CombatConfig::default().ult_gauge_max);
    assert!(!gauge.try_use());
    assert_eq!(gauge.add(5_000), gauge.max());
    assert!(gauge.try_use());
    assert_eq!(gauge.current(), 0);
    assert!(!gauge.try_use());
}

#[test]
fn boss_breaks_once_and_takes_bonus_damage() {
    let mut boss = EnemyTemplate::new("warden", 100_000, 10.0, 0.0, 0.0);
    boss.category = EnemyCategory::Boss;
    boss.break_gauge = 50;
    let catalog = EnemyCatalog::new([boss]);
    let mut battle = build(
        single_enemy_stage("warden"),
        vec![gunner("vanguard")],
        &catalog,
        FixedRng::constant(0.5),
    );

    battle.tick(1_000, &[]);
    assert!(
        battle
            .drain_events()
            .iter()
            .any(|e| matches!(e, CombatEvent::BossSpawned { break_gauge: 50, .. }))
    );

    assert!(battle.use_skill(SkillSlot::Skill2));
    let overlaps = volley(&battle);
    battle.tick(16, &overlaps);
    let events = battle.drain_events();

    let breaks: Vec<(u32, bool)> = events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::BreakChanged {
                current, is_broken, ..
            } => Some((*current, *is_broken)),
            _ => None,
        })
        .collect();
    assert_eq!(
        breaks,
        vec![(40, false), (30, false), (20, false), (10, false), (0, true)]
    );

    let broken = events
        .iter()
        .filter(|e| matches!(e, CombatEvent::BossBroken { is_broken: true, .. }))
        .count();
    assert_eq!(broken, 1);

    let hits: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::DamageDealt { amount, .. } => Some(*amount),
            _ => None,
        })
        .collect();
    assert_eq!(hits, [[100; 5], [150; 5]].concat());

    let (_, warden) = battle.enemies().iter().next().unwrap();
    assert!(warden.is_broken());
    assert_eq!(warden.unit.hp(), 100_000 - 1_250);
    assert_eq!(warden.boss().unwrap().phase, 1);
}

#[test]
fn shield_absorbs_before_health() {
    let mut brute = dummy("brute", 1_000);
    brute.atk = 80.0;
    let catalog = EnemyCatalog::new([brute]);
    let mut member = gunner("vanguard");
    member.stats.shield = 50;
    member.stats.hp = 100;
    let mut battle = build(
        single_enemy_stage("brute"),
        vec![member],
        &catalog,
        FixedRng::constant(0.5),
    );

    battle.tick(1_000, &[]);
    let (enemy, _) = battle.enemies().iter().next().unwrap();
    battle.tick(16, &[Overlap::EnemyContactPlayer { enemy, member: 0 }]);

    assert_eq!(battle.shield().current(), 0);
    assert_eq!(battle.party().active().unit.hp(), 70);

    let events = battle.drain_events();
    let shield_at = events
        .iter()
        .position(|e| matches!(e, CombatEvent::ShieldChanged { current: 0, .. }))
        .unwrap();
    let hp_at = events
        .iter()
        .position(|e| matches!(e, CombatEvent::HpChanged { current: 70, .. }))
        .unwrap();
    assert!(shield_at < hp_at);
}
