//! Battle entities: the shared unit record, pooled enemies and projectiles,
//! and the party.
mod combatant;
mod party;
mod projectile;
mod unit;
mod weapon;

pub use combatant::{BossExtension, ChargeState, Combatant, CombatantKind};
pub use party::{BuffStat, Party, PartyMember, TimedBuff};
pub use projectile::{Launch, Projectile, ProjectileFlags};
pub use unit::{CombatUnit, UnitStats};
pub use weapon::{WeaponConfig, WeaponKind, WeaponState};
