use bitflags::bitflags;

use crate::combat::AttackProfile;
use crate::pool::{Handle, Poolable};
use crate::types::{Side, Vec2};

bitflags! {
    /// Behavior switches of a projectile.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ProjectileFlags: u8 {
        /// Keeps flying after a hit; each enemy is hit at most once.
        const PIERCING = 1 << 0;
        /// Fired by an active skill.
        const SKILL    = 1 << 1;
        /// Fired by an ultimate.
        const ULT      = 1 << 2;
        /// Fired by a boss (larger body).
        const HEAVY    = 1 << 3;
    }
}

/// Parameters for launching a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Launch {
    pub origin: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub attack: AttackProfile,
    pub flags: ProjectileFlags,
    pub explosion_radius: f32,
}

/// Pooled bullet. The attack profile is captured when fired and never
/// re-read from the shooter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Projectile {
    active: bool,
    pub side: Side,
    pub position: Vec2,
    pub velocity: Vec2,
    pub attack: AttackProfile,
    pub flags: ProjectileFlags,
    pub explosion_radius: f32,
    pierced: Vec<Handle>,
}

impl Projectile {
    /// Initializes a freshly acquired slot.
    pub fn fire(&mut self, side: Side, launch: Launch) {
        self.active = true;
        self.side = side;
        self.position = launch.origin;
        self.velocity = Vec2::from_angle(launch.angle) * launch.speed;
        self.attack = launch.attack;
        self.flags = launch.flags;
        self.explosion_radius = launch.explosion_radius.max(0.0);
        self.pierced.clear();
    }

    pub fn is_piercing(&self) -> bool {
        self.flags.contains(ProjectileFlags::PIERCING)
    }

    pub fn explodes(&self) -> bool {
        self.explosion_radius > 0.0
    }

    pub fn has_pierced(&self, target: Handle) -> bool {
        self.pierced.contains(&target)
    }

    /// Records a hit on `target`. Only meaningful for piercing projectiles.
    pub fn mark_pierced(&mut self, target: Handle) {
        if self.is_piercing() && !self.has_pierced(target) {
            self.pierced.push(target);
        }
    }

    pub fn advance(&mut self, dt_ms: u32) {
        self.position += self.velocity * (dt_ms as f32 / 1000.0);
    }
}

impl Poolable for Projectile {
    fn is_active(&self) -> bool {
        self.active
    }

    fn release(&mut self) {
        self.active = false;
        self.velocity = Vec2::ZERO;
        self.attack = AttackProfile::default();
        self.pierced.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{EntityPool, PoolPolicy};

    fn launch(flags: ProjectileFlags) -> Launch {
        Launch {
            origin: Vec2::new(10.0, 10.0),
            angle: 0.0,
            speed: 500.0,
            attack: AttackProfile {
                atk: 40.0,
                ..AttackProfile::default()
            },
            flags,
            explosion_radius: 0.0,
        }
    }

    #[test]
    fn fire_sets_velocity_from_angle() {
        let mut p = Projectile::default();
        p.fire(Side::Party, launch(ProjectileFlags::empty()));
        assert!(p.is_active());
        assert!((p.velocity.x - 500.0).abs() < 1e-3);
        p.advance(100);
        assert!((p.position.x - 60.0).abs() < 1e-3);
    }

    #[test]
    fn pierced_set_is_cleared_on_release() {
        let mut targets: EntityPool<Projectile> = EntityPool::new(1, PoolPolicy::Fixed);
        let (enemy, slot) = targets.acquire().unwrap();
        slot.fire(Side::Enemy, launch(ProjectileFlags::empty()));

        let mut p = Projectile::default();
        p.fire(Side::Party, launch(ProjectileFlags::PIERCING));
        p.mark_pierced(enemy);
        assert!(p.has_pierced(enemy));

        p.release();
        assert!(!p.is_active());
        assert_eq!(p.velocity, Vec2::ZERO);
        assert!(!p.has_pierced(enemy));
    }

    #[test]
    fn non_piercing_does_not_track_targets() {
        let mut pool: EntityPool<Projectile> = EntityPool::new(1, PoolPolicy::Fixed);
        let (handle, _) = pool.acquire().unwrap();

        let mut p = Projectile::default();
        p.fire(Side::Party, launch(ProjectileFlags::empty()));
        p.mark_pierced(handle);
        assert!(!p.has_pierced(handle));
    }
}
