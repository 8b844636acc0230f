//! Named attack patterns as pure emission plans.
//!
//! A pattern never touches a bullet pool. It turns `(shooter, target)` into
//! a list of [`Emission`]s with explicit delays; the battle fires the
//! zero-delay ones immediately and queues the rest.

use std::f32::consts::{PI, TAU};

use crate::rng::CombatRng;
use crate::types::Vec2;

/// One projectile to launch from the owner's position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    pub angle: f32,
    pub speed: f32,
    pub atk: f32,
    /// Re-aim at the target when the shot fires; `angle` is then only the
    /// aim error added on top.
    pub retarget: bool,
}

impl Shot {
    /// Launch angle from `origin`. A retargeting shot with no target left
    /// has nothing to aim at and yields `None`.
    pub fn launch_angle(&self, origin: Vec2, target: Option<Vec2>) -> Option<f32> {
        if !self.retarget {
            return Some(self.angle);
        }
        target.map(|t| origin.angle_to(t) + self.angle)
    }
}

/// A shot with its delay relative to the moment the pattern was chosen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Emission {
    pub delay_ms: u32,
    pub shot: Shot,
}

impl Emission {
    pub fn now(angle: f32, speed: f32, atk: f32) -> Self {
        Self::after(0, angle, speed, atk)
    }

    pub fn after(delay_ms: u32, angle: f32, speed: f32, atk: f32) -> Self {
        Self {
            delay_ms,
            shot: Shot {
                angle,
                speed,
                atk,
                retarget: false,
            },
        }
    }

    /// Delayed shot aimed at the target's position when it fires.
    pub fn tracking(delay_ms: u32, error: f32, speed: f32, atk: f32) -> Self {
        Self {
            delay_ms,
            shot: Shot {
                angle: error,
                speed,
                atk,
                retarget: true,
            },
        }
    }
}

/// Dash executed by the owner before a delayed volley.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Charge {
    pub velocity: Vec2,
    pub duration_ms: u32,
}

/// Output of a pattern invocation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatternPlan {
    pub emissions: Vec<Emission>,
    pub charge: Option<Charge>,
}

/// Offensive parameters of the entity executing a pattern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shooter {
    pub origin: Vec2,
    pub atk: f32,
    pub spd: f32,
    pub bullet_speed: f32,
    pub bullet_count: u32,
}

// ============================================================================
// Enemy patterns
// ============================================================================

/// Behavior tag of a regular enemy.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EnemyPattern {
    #[default]
    ChaseShoot,
    ChaseBurst,
    StationarySnipe,
    ChaseContact,
    ChargeShoot,
    GuardShoot,
    SupportHeal,
}

impl EnemyPattern {
    /// Parses a tag, falling back to `chase_shoot` for unknown tags.
    pub fn parse_lenient(tag: &str) -> Self {
        tag.trim().parse().unwrap_or_default()
    }

    /// Fraction of base speed used to close in on the target. Zero means the
    /// enemy holds position.
    pub const fn move_factor(self) -> f32 {
        match self {
            Self::ChaseShoot | Self::ChaseBurst | Self::ChaseContact => 1.0,
            Self::ChargeShoot => 0.6,
            Self::GuardShoot => 0.5,
            Self::StationarySnipe | Self::SupportHeal => 0.0,
        }
    }

    /// Whether the fire timer triggers volleys.
    pub const fn fires(self) -> bool {
        !matches!(self, Self::ChaseContact | Self::SupportHeal)
    }

    /// Whether overlapping a party member deals contact damage.
    pub const fn deals_contact_damage(self) -> bool {
        matches!(self, Self::ChaseContact)
    }

    /// Volley fired when the fire timer elapses.
    pub fn volley(
        self,
        shooter: &Shooter,
        target: Vec2,
        burst_delay_ms: u32,
        rng: &mut impl CombatRng,
    ) -> Vec<Emission> {
        let aim = shooter.origin.angle_to(target);
        let speed = shooter.bullet_speed;
        let atk = shooter.atk;

        match self {
            Self::ChaseShoot | Self::StationarySnipe | Self::GuardShoot => {
                vec![Emission::now(aim + aim_jitter(rng), speed, atk)]
            }
            Self::ChaseBurst => (0..shooter.bullet_count.max(1))
                .map(|i| match i {
                    0 => Emission::now(aim + aim_jitter(rng), speed, atk),
                    _ => Emission::tracking(i * burst_delay_ms, aim_jitter(rng), speed, atk),
                })
                .collect(),
            Self::ChargeShoot => {
                let n = shooter.bullet_count.max(1);
                let center = (n - 1) as f32 / 2.0;
                (0..n)
                    .map(|i| Emission::now(aim + (i as f32 - center) * 0.15, speed, atk))
                    .collect()
            }
            Self::ChaseContact | Self::SupportHeal => Vec::new(),
        }
    }
}

/// Uniform aim error in `[-0.05, 0.05)` radians.
fn aim_jitter(rng: &mut impl CombatRng) -> f32 {
    (rng.unit() - 0.5) * 0.1
}

// ============================================================================
// Boss patterns
// ============================================================================

/// Named boss attack routine.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BossPattern {
    SpreadShot,
    AimedShot,
    LaserSweep,
    Barrage,
    LaserCross,
    ChargeAttack,
}

/// Round-robin pattern lists per phase (index 0 is phase 1).
pub const PHASE_PATTERNS: [&[BossPattern]; 2] = [
    &[
        BossPattern::SpreadShot,
        BossPattern::AimedShot,
        BossPattern::LaserSweep,
    ],
    &[
        BossPattern::Barrage,
        BossPattern::LaserCross,
        BossPattern::ChargeAttack,
    ],
];

/// Pattern list of a 1-based phase. Phases past the table reuse the last one.
pub fn phase_patterns(phase: u8) -> &'static [BossPattern] {
    let index = (phase.max(1) as usize - 1).min(PHASE_PATTERNS.len() - 1);
    PHASE_PATTERNS[index]
}

impl BossPattern {
    pub fn plan(self, shooter: &Shooter, target: Vec2) -> PatternPlan {
        let aim = shooter.origin.angle_to(target);
        let speed = shooter.bullet_speed;
        let atk = shooter.atk;

        match self {
            // 8-way fan centred slightly left of the target.
            Self::SpreadShot => PatternPlan {
                emissions: (0..8)
                    .map(|i| Emission::now(aim + (i as f32 - 4.0) * 0.2, speed, atk))
                    .collect(),
                charge: None,
            },
            // 3 fast aimed shots, 150ms apart.
            Self::AimedShot => PatternPlan {
                emissions: (0..3)
                    .map(|i| Emission::after(i * 150, aim, speed * 1.5, atk * 1.3))
                    .collect(),
                charge: None,
            },
            // 12 shots sweeping a 1.2 rad arc, 80ms apart.
            Self::LaserSweep => PatternPlan {
                emissions: (0..12)
                    .map(|i| {
                        let angle = aim - 0.6 + (i as f32 / 11.0) * 1.2;
                        Emission::after(i * 80, angle, speed, atk * 0.8)
                    })
                    .collect(),
                charge: None,
            },
            // 16-way ring.
            Self::Barrage => PatternPlan {
                emissions: ring(16, speed * 0.8, atk, 0),
                charge: None,
            },
            // 4 cardinal streams of 5 accelerating shots, 100ms apart.
            Self::LaserCross => PatternPlan {
                emissions: (0..4)
                    .flat_map(|d| {
                        let angle = d as f32 * PI / 2.0;
                        (0..5).map(move |i| {
                            Emission::after(
                                i * 100,
                                angle,
                                speed * (0.8 + i as f32 * 0.1),
                                atk * 0.9,
                            )
                        })
                    })
                    .collect(),
                charge: None,
            },
            // Dash at the target for 500ms, then a 12-way ring.
            Self::ChargeAttack => PatternPlan {
                emissions: ring(12, speed, atk * 1.2, 500),
                charge: Some(Charge {
                    velocity: Vec2::from_angle(aim) * (shooter.spd * 3.0),
                    duration_ms: 500,
                }),
            },
        }
    }
}

fn ring(count: u32, speed: f32, atk: f32, delay_ms: u32) -> Vec<Emission> {
    (0..count)
        .map(|i| Emission::after(delay_ms, i as f32 / count as f32 * TAU, speed, atk))
        .collect()
}
