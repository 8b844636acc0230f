//! Naive circle-overlap detection.
//!
//! Stands in for a physics engine: every body is a circle and every pair is
//! tested each tick. Good enough for a headless run with a few dozen bodies.

use combat_core::{Battle, EnemyCategory, Overlap, Vec2};

use crate::api::OverlapProvider;

/// Collision radii of each body kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyRadii {
    pub player_bullet: f32,
    pub enemy_bullet: f32,
    pub normal_enemy: f32,
    pub elite_enemy: f32,
    pub boss: f32,
    pub member: f32,
}

impl Default for BodyRadii {
    fn default() -> Self {
        Self {
            player_bullet: 6.0,
            enemy_bullet: 8.0,
            normal_enemy: 20.0 / 2.0,
            elite_enemy: 36.0 / 2.0,
            boss: 68.0 / 2.0,
            member: 28.0 / 2.0,
        }
    }
}

impl BodyRadii {
    pub fn enemy(&self, category: EnemyCategory) -> f32 {
        match category {
            EnemyCategory::Normal => self.normal_enemy,
            EnemyCategory::Elite => self.elite_enemy,
            EnemyCategory::Boss => self.boss,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RadiusOverlapProvider {
    radii: BodyRadii,
}

impl RadiusOverlapProvider {
    pub fn new(radii: BodyRadii) -> Self {
        Self { radii }
    }

    pub fn radii(&self) -> &BodyRadii {
        &self.radii
    }
}

fn touches(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

impl OverlapProvider for RadiusOverlapProvider {
    fn collect(&mut self, battle: &Battle, out: &mut Vec<Overlap>) {
        let radii = &self.radii;

        for (bullet, b) in battle.player_bullets().iter() {
            for (enemy, e) in battle.enemies().iter() {
                if !e.is_targetable() || b.has_pierced(enemy) {
                    continue;
                }
                if touches(
                    b.position,
                    radii.player_bullet,
                    e.unit.position,
                    radii.enemy(e.category),
                ) {
                    out.push(Overlap::PlayerBulletEnemy { bullet, enemy });
                    if !b.is_piercing() {
                        break;
                    }
                }
            }
        }

        let members = battle.party().members();

        for (bullet, b) in battle.enemy_bullets().iter() {
            let hit = members.iter().position(|m| {
                m.is_alive() && touches(b.position, radii.enemy_bullet, m.unit.position, radii.member)
            });
            if let Some(member) = hit {
                out.push(Overlap::EnemyBulletPlayer { bullet, member });
            }
        }

        for (enemy, e) in battle.enemies().iter() {
            if !e.is_targetable() {
                continue;
            }
            let body = radii.enemy(e.category);
            for (member, m) in members.iter().enumerate() {
                if m.is_alive() && touches(e.unit.position, body, m.unit.position, radii.member) {
                    out.push(Overlap::EnemyContactPlayer { enemy, member });
                }
            }
        }
    }
}
