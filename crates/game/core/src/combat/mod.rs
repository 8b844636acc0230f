//! Combat resolution.
//!
//! Pure building blocks used by the battle when it applies a hit:
//!
//! - `resolve_damage`: attack/defense/crit/jitter into an integer damage value
//! - `break_damage`: break-gauge damage derived from a resolved hit
//! - [`ShieldLedger`]: party-wide absorption drained before HP
//! - [`BreakGauge`]: per-boss stun meter
//!
//! The ordering of a single damage application (shield, HP, death, break,
//! phase) lives in [`crate::battle`].

pub mod break_gauge;
pub mod damage;
pub mod shield;

pub use break_gauge::{BreakGauge, BreakOutcome};
pub use damage::{
    AttackProfile, DamageRoll, DefenseProfile, break_damage, defense_multiplier, resolve_damage,
};
pub use shield::{ShieldAbsorb, ShieldLedger};
