use combat_content::{ContentBundle, bundled_data_dir};
use combat_core::{
    AreaDefinition, Archetype, BattleSetup, BattleStatus, CombatConfig, CombatEvent, EnemyCatalog,
    EnemyTemplate, MemberLoadout, MemberStats, SetupError, StageDefinition, WaveDefinition,
    WaveEntry,
};
use runtime::{BattleRuntime, NoInput, RuntimeConfig, RuntimeError, Topic};

fn skirmish() -> (BattleSetup, EnemyCatalog) {
    let mut drone = EnemyTemplate::new("drone", 50, 5.0, 0.0, 40.0);
    drone.attack_pattern = "chase_contact".into();

    let stage = StageDefinition {
        id: "skirmish".into(),
        name: "Skirmish".into(),
        time_limit_secs: 60,
        areas: vec![AreaDefinition {
            name: "yard".into(),
            waves: vec![WaveDefinition::new([WaveEntry::new("drone", 2)])],
            ..AreaDefinition::default()
        }],
    };
    let party = vec![MemberLoadout::new(
        "rin",
        Archetype::Dps,
        MemberStats {
            def: 0.0,
            ..MemberStats::default()
        },
    )];

    let setup = BattleSetup {
        stage,
        party,
        config: CombatConfig::default(),
    };
    (setup, EnemyCatalog::new([drone]))
}

#[test]
fn autopilot_clears_a_skirmish() {
    let (setup, catalog) = skirmish();
    let mut runtime = BattleRuntime::builder(setup)
        .config(RuntimeConfig {
            max_ticks: 10_000,
            ..RuntimeConfig::default()
        })
        .build(&catalog)
        .unwrap();
    let mut progression = runtime.bus().subscribe(Topic::Progression).unwrap();

    let report = runtime.run_to_completion().unwrap();

    assert_eq!(report.status, BattleStatus::Cleared);
    assert_eq!(report.enemies_defeated, 2);
    assert!(report.stars >= 2);
    assert!(report.total_damage_dealt >= 100);

    let mut last = None;
    while let Ok(event) = progression.try_recv() {
        assert_eq!(event.topic(), Topic::Progression);
        last = Some(event.payload);
    }
    assert!(matches!(last, Some(CombatEvent::StageCleared { .. })));
}

#[test]
fn finished_runtime_does_not_step() {
    let (setup, catalog) = skirmish();
    let mut runtime = BattleRuntime::builder(setup).build(&catalog).unwrap();
    runtime.run_to_completion().unwrap();

    let ticks = runtime.ticks();
    assert!(runtime.status().is_finished());
    runtime.step();
    assert_eq!(runtime.ticks(), ticks);
}

#[test]
fn tick_budget_is_enforced() {
    let (setup, catalog) = skirmish();
    let mut runtime = BattleRuntime::builder(setup)
        .config(RuntimeConfig {
            max_ticks: 10,
            ..RuntimeConfig::default()
        })
        .input(NoInput)
        .build(&catalog)
        .unwrap();

    let err = runtime.run_to_completion().unwrap_err();
    assert!(matches!(err, RuntimeError::TickBudgetExhausted { ticks: 10 }));
    assert_eq!(runtime.battle().clock().0, 160);
}

#[test]
fn setup_errors_surface() {
    let (mut setup, catalog) = skirmish();
    setup.party.clear();
    let err = BattleRuntime::builder(setup).build(&catalog).unwrap_err();
    assert!(matches!(err, RuntimeError::Setup(SetupError::EmptyParty)));

    let (setup, catalog) = skirmish();
    let err = BattleRuntime::builder(setup)
        .config(RuntimeConfig {
            tick_ms: 0,
            ..RuntimeConfig::default()
        })
        .build(&catalog)
        .unwrap_err();
    assert!(matches!(err, RuntimeError::ZeroTickInterval));
}

#[test]
fn same_seed_replays_the_same_battle() {
    let collect = || {
        let bundle = ContentBundle::load_dir(bundled_data_dir(), "stage.ron").unwrap();
        let config = RuntimeConfig {
            event_capacity: 100_000,
            ..RuntimeConfig::default()
        };
        let mut runtime = BattleRuntime::from_bundle(bundle, config).unwrap();
        let mut rx = runtime.bus().subscribe(Topic::Combat).unwrap();
        for _ in 0..600 {
            runtime.step();
        }
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(serde_json::to_string(&event).unwrap());
        }
        events
    };

    let first = collect();
    assert!(!first.is_empty(), "bundled stage should see combat in ten seconds");
    assert_eq!(first, collect());
}
