//! Weapons and the auto-fire cycle.

/// Weapon family carried by a party member.
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
pub enum WeaponKind {
    #[default]
    Pistol,
    AssaultRifle,
    Shotgun,
    SniperRifle,
    Launcher,
}

/// Static weapon parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponConfig {
    pub range: f32,
    /// Shots per second.
    pub fire_rate: f32,
    pub magazine_size: u32,
    pub reload_ms: u32,
    /// Total spread cone in degrees.
    pub spread_deg: f32,
    pub bullet_speed: f32,
    pub pellets: u32,
    pub piercing: bool,
    pub explosion_radius: f32,
}

impl WeaponKind {
    /// Reference parameters of each weapon family.
    pub const fn config(self) -> WeaponConfig {
        match self {
            Self::Pistol => WeaponConfig {
                range: 250.0,
                fire_rate: 5.0,
                magazine_size: 12,
                reload_ms: 1200,
                spread_deg: 3.0,
                bullet_speed: 500.0,
                pellets: 1,
                piercing: false,
                explosion_radius: 0.0,
            },
            Self::AssaultRifle => WeaponConfig {
                range: 300.0,
                fire_rate: 6.0,
                magazine_size: 30,
                reload_ms: 1800,
                spread_deg: 5.0,
                bullet_speed: 450.0,
                pellets: 1,
                piercing: false,
                explosion_radius: 0.0,
            },
            Self::Shotgun => WeaponConfig {
                range: 150.0,
                fire_rate: 1.2,
                magazine_size: 6,
                reload_ms: 2000,
                spread_deg: 25.0,
                bullet_speed: 400.0,
                pellets: 5,
                piercing: false,
                explosion_radius: 0.0,
            },
            Self::SniperRifle => WeaponConfig {
                range: 450.0,
                fire_rate: 0.8,
                magazine_size: 5,
                reload_ms: 2500,
                spread_deg: 0.0,
                bullet_speed: 700.0,
                pellets: 1,
                piercing: true,
                explosion_radius: 0.0,
            },
            Self::Launcher => WeaponConfig {
                range: 280.0,
                fire_rate: 0.6,
                magazine_size: 3,
                reload_ms: 3000,
                spread_deg: 0.0,
                bullet_speed: 300.0,
                pellets: 1,
                piercing: false,
                explosion_radius: 60.0,
            },
        }
    }
}

impl WeaponConfig {
    pub fn fire_interval_ms(&self) -> f32 {
        if self.fire_rate <= 0.0 {
            f32::INFINITY
        } else {
            1000.0 / self.fire_rate
        }
    }
}

/// Magazine, reload and fire-interval state of an equipped weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponState {
    pub kind: WeaponKind,
    pub config: WeaponConfig,
    magazine: u32,
    reload_remaining_ms: Option<f32>,
    fire_timer_ms: f32,
}

impl Default for WeaponState {
    fn default() -> Self {
        Self::new(WeaponKind::default())
    }
}

impl WeaponState {
    pub fn new(kind: WeaponKind) -> Self {
        let config = kind.config();
        Self {
            kind,
            config,
            magazine: config.magazine_size,
            reload_remaining_ms: None,
            fire_timer_ms: 0.0,
        }
    }

    pub fn magazine(&self) -> u32 {
        self.magazine
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_remaining_ms.is_some()
    }

    /// Advances reload and fire timers. Returns true when a shot may be
    /// taken this tick; the caller still has to find a target in range and
    /// then call [`on_fired`](Self::on_fired).
    ///
    /// An empty magazine starts a reload instead of firing.
    pub fn tick(&mut self, dt_ms: u32) -> bool {
        let dt = dt_ms as f32;

        if let Some(remaining) = self.reload_remaining_ms {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.reload_remaining_ms = None;
                self.magazine = self.config.magazine_size;
            } else {
                self.reload_remaining_ms = Some(remaining);
            }
            return false;
        }

        self.fire_timer_ms -= dt;
        if self.fire_timer_ms > 0.0 {
            return false;
        }

        if self.magazine == 0 {
            self.reload_remaining_ms = Some(self.config.reload_ms as f32);
            return false;
        }

        true
    }

    pub fn on_fired(&mut self) {
        self.fire_timer_ms = self.config.fire_interval_ms();
        self.magazine = self.magazine.saturating_sub(1);
    }
}
