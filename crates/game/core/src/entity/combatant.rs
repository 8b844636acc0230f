use crate::ai::patterns::{Charge, EnemyPattern, Shooter};
use crate::catalog::{EnemyCategory, EnemyTemplate};
use crate::combat::BreakGauge;
use crate::config::CombatConfig;
use crate::entity::unit::{CombatUnit, UnitStats};
use crate::pool::Poolable;
use crate::rng::CombatRng;
use crate::types::Vec2;

/// Boss-only state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BossExtension {
    pub break_gauge: BreakGauge,
    /// 1-based, never decreases.
    pub phase: u8,
    /// Round-robin cursor into the current phase's pattern list.
    pub pattern_cursor: usize,
    pub pattern_timer_ms: f32,
    /// Active dash from a charge pattern.
    pub charge: Option<ChargeState>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChargeState {
    pub velocity: Vec2,
    pub remaining_ms: u32,
}

impl From<Charge> for ChargeState {
    fn from(charge: Charge) -> Self {
        Self {
            velocity: charge.velocity,
            remaining_ms: charge.duration_ms,
        }
    }
}

impl BossExtension {
    pub fn new(break_gauge: u32, config: &CombatConfig) -> Self {
        Self {
            break_gauge: BreakGauge::new(break_gauge),
            phase: 1,
            pattern_cursor: 0,
            pattern_timer_ms: config.boss_first_pattern_delay_ms as f32,
            charge: None,
        }
    }
}

/// Regular enemy or boss.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CombatantKind {
    #[default]
    Enemy,
    Boss(Box<BossExtension>),
}

/// Pooled hostile entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Combatant {
    active: bool,
    pub template_id: String,
    pub category: EnemyCategory,
    pub unit: CombatUnit,
    pub pattern: EnemyPattern,
    pub bullet_speed: f32,
    pub fire_rate: f32,
    pub bullet_count: u32,
    pub fire_timer_ms: f32,
    pub contact_cooldown_ms: u32,
    pub kind: CombatantKind,
}

impl Combatant {
    /// Initializes a freshly acquired slot from a template.
    pub fn spawn(
        &mut self,
        template: &EnemyTemplate,
        position: Vec2,
        config: &CombatConfig,
        rng: &mut impl CombatRng,
    ) {
        self.active = true;
        self.template_id.clone_from(&template.id);
        self.category = template.category;
        self.unit = CombatUnit::new(
            template.name.as_str(),
            template.attribute,
            None,
            UnitStats {
                max_hp: template.hp,
                atk: template.atk,
                def: template.def,
                spd: template.spd,
                crit_rate: 0.0,
                crit_dmg: 100.0,
            },
            position,
        );
        self.pattern = EnemyPattern::parse_lenient(&template.attack_pattern);
        self.bullet_speed = template.bullet_speed;
        self.fire_rate = template.fire_rate;
        self.bullet_count = template.bullet_count.max(1);
        self.fire_timer_ms = config.enemy_first_fire_delay_ms as f32
            + rng.unit() * config.enemy_first_fire_jitter_ms as f32;
        self.contact_cooldown_ms = 0;
        self.kind = if template.is_boss() {
            CombatantKind::Boss(Box::new(BossExtension::new(template.break_gauge, config)))
        } else {
            CombatantKind::Enemy
        };
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, CombatantKind::Boss(_))
    }

    pub fn boss(&self) -> Option<&BossExtension> {
        match &self.kind {
            CombatantKind::Boss(ext) => Some(&**ext),
            CombatantKind::Enemy => None,
        }
    }

    pub fn boss_mut(&mut self) -> Option<&mut BossExtension> {
        match &mut self.kind {
            CombatantKind::Boss(ext) => Some(&mut **ext),
            CombatantKind::Enemy => None,
        }
    }

    pub fn is_broken(&self) -> bool {
        self.boss().is_some_and(|b| b.break_gauge.is_broken())
    }

    /// Active and not dead: eligible for targeting and damage.
    pub fn is_targetable(&self) -> bool {
        self.active && self.unit.is_alive()
    }

    pub fn shooter(&self) -> Shooter {
        Shooter {
            origin: self.unit.position,
            atk: self.unit.atk,
            spd: self.unit.spd,
            bullet_speed: self.bullet_speed,
            bullet_count: self.bullet_count,
        }
    }

    /// Moves the body and keeps it inside the field.
    pub fn advance(&mut self, dt_ms: u32, config: &CombatConfig) {
        let unit = &mut self.unit;
        unit.position += unit.velocity * (dt_ms as f32 / 1000.0);
        unit.position.x = unit.position.x.clamp(0.0, config.field_width);
        unit.position.y = unit.position.y.clamp(0.0, config.field_height);
    }
}

impl Poolable for Combatant {
    fn is_active(&self) -> bool {
        self.active
    }

    fn release(&mut self) {
        self.active = false;
        self.unit.velocity = Vec2::ZERO;
        if let Some(boss) = self.boss_mut() {
            boss.charge = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FixedRng;

    #[test]
    fn spawn_initializes_enemy_from_template() {
        let config = CombatConfig::default();
        let mut rng = FixedRng::constant(0.5);
        let mut template = EnemyTemplate::new("drone", 120, 12.0, 4.0, 90.0);
        template.attack_pattern = "chase_burst".into();
        template.bullet_count = 3;

        let mut enemy = Combatant::default();
        enemy.spawn(&template, Vec2::new(100.0, 100.0), &config, &mut rng);

        assert!(enemy.is_active());
        assert!(!enemy.is_boss());
        assert_eq!(enemy.unit.hp(), 120);
        assert_eq!(enemy.pattern, EnemyPattern::ChaseBurst);
        // 1000 + 0.5 * 2000
        assert_eq!(enemy.fire_timer_ms, 2000.0);
    }

    #[test]
    fn boss_spawn_attaches_extension() {
        let config = CombatConfig::default();
        let mut rng = FixedRng::constant(0.0);
        let mut template = EnemyTemplate::new("overlord", 5000, 50.0, 30.0, 60.0);
        template.category = EnemyCategory::Boss;
        template.break_gauge = 800;

        let mut boss = Combatant::default();
        boss.spawn(&template, Vec2::ZERO, &config, &mut rng);

        let ext = boss.boss().unwrap();
        assert_eq!(ext.phase, 1);
        assert_eq!(ext.break_gauge.max(), 800);
        assert_eq!(ext.pattern_timer_ms, 2000.0);
        assert!(!boss.is_broken());
    }

    #[test]
    fn release_keeps_ai_timers() {
        let config = CombatConfig::default();
        let mut rng = FixedRng::constant(0.0);
        let template = EnemyTemplate::new("drone", 10, 1.0, 0.0, 10.0);

        let mut enemy = Combatant::default();
        enemy.spawn(&template, Vec2::ZERO, &config, &mut rng);
        enemy.unit.velocity = Vec2::new(5.0, 5.0);
        enemy.release();

        assert!(!enemy.is_active());
        assert_eq!(enemy.unit.velocity, Vec2::ZERO);
        assert_eq!(enemy.fire_timer_ms, 1000.0);
    }
}
