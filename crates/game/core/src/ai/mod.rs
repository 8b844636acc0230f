//! Enemy and boss behavior.
//!
//! Controllers are plain functions over a [`Combatant`](crate::entity::Combatant):
//! they steer the entity and return emission plans, leaving projectile
//! allocation and delayed execution to the battle.

pub mod boss;
pub mod enemy;
pub mod patterns;
pub mod schedule;

pub use boss::{BossStep, check_phase_transition, update_boss};
pub use enemy::update_enemy;
pub use patterns::{
    BossPattern, Charge, EnemyPattern, Emission, PHASE_PATTERNS, PatternPlan, Shooter, Shot,
    phase_patterns,
};
pub use schedule::{ActionSchedule, ScheduledAction};
