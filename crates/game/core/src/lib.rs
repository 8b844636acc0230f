//! Real-time squad combat simulation.
//!
//! `combat-core` holds the rules of a wave-based top-down battle: damage
//! resolution, the party shield, boss break gauges, skill cooldowns and the
//! ultimate meter, pooled enemies and projectiles, enemy and boss AI, and the
//! wave/area director that drives a stage to completion. It performs no I/O
//! and owns no clock; a host advances a [`Battle`] with elapsed time and the
//! overlaps its spatial layer detected, then drains the resulting
//! [`CombatEvent`]s.
pub mod ai;
pub mod attribute;
pub mod battle;
pub mod catalog;
pub mod combat;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod pool;
pub mod rng;
pub mod skills;
pub mod stage;
pub mod types;

pub use ai::{BossPattern, EnemyPattern};
pub use attribute::{Archetype, Attribute, attribute_multiplier};
pub use battle::{Battle, BattleReport, BattleSetup, BattleStatus, Overlap};
pub use catalog::{
    EnemyCatalog, EnemyCategory, EnemyOracle, EnemyTemplate, MemberLoadout, MemberStats,
};
pub use combat::{
    AttackProfile, BreakGauge, BreakOutcome, DamageRoll, DefenseProfile, ShieldLedger,
    break_damage, resolve_damage,
};
pub use config::CombatConfig;
pub use entity::{
    BossExtension, Combatant, CombatantKind, CombatUnit, Party, PartyMember, Projectile,
    ProjectileFlags, WeaponKind,
};
pub use error::{CombatError, ErrorSeverity, SetupError};
pub use events::{CombatEvent, DamageTarget};
pub use pool::{EntityPool, Handle, PoolPolicy, Poolable};
pub use rng::{CombatRng, FixedRng, PcgRng};
pub use skills::{CooldownGauge, SkillLoadout, SkillSlot, SkillSpec, UltGauge, UltSpec};
pub use stage::{
    AreaDefinition, StageDefinition, WaveAreaDirector, WaveDefinition, WaveEntry,
};
pub use types::{Millis, Side, Vec2};
