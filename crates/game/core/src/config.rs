/// Balance constants and tunable parameters for a battle.
///
/// `Default` reproduces the reference balance. Every field is optional when
/// deserialized, so balance files only need to list what they override.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    // ===== playfield =====
    pub field_width: f32,
    pub field_height: f32,
    /// Distance beyond the field edge at which projectiles are released.
    pub projectile_margin: f32,

    // ===== damage =====
    pub advantage_multiplier: f32,
    pub disadvantage_multiplier: f32,
    /// Defense curve constant `k` in `1 - def / (def + k)`.
    pub defense_curve: f32,
    pub jitter_min: f32,
    pub jitter_max: f32,

    // ===== break =====
    pub break_damage_ratio: f32,
    pub breaker_break_bonus: f32,
    pub break_duration_ms: u32,
    pub break_damage_bonus: f32,

    // ===== boss =====
    pub boss_phase_threshold: f32,
    pub boss_first_pattern_delay_ms: u32,
    pub boss_pattern_interval_ms: u32,
    pub boss_pattern_jitter_ms: u32,
    pub boss_chase_factor: f32,

    // ===== enemy =====
    pub enemy_first_fire_delay_ms: u32,
    pub enemy_first_fire_jitter_ms: u32,
    pub burst_shot_delay_ms: u32,
    pub contact_cooldown_ms: u32,

    // ===== skills =====
    pub ult_gauge_max: u32,
    pub ult_charge_on_deal: u32,
    pub ult_charge_on_receive: u32,
    pub ult_charge_on_kill: u32,
    pub default_skill1_cooldown_ms: u32,
    pub default_skill2_cooldown_ms: u32,
    pub tank_shield_refill: u32,
    pub support_atk_buff_ratio: f32,
    pub support_buff_duration_ms: u32,

    // ===== player =====
    pub dodge_cooldown_ms: u32,
    pub dodge_duration_ms: u32,
    pub dodge_speed_factor: f32,

    // ===== progression =====
    pub first_wave_delay_ms: u32,
    pub next_wave_delay_ms: u32,
    pub area_transition_delay_ms: u32,
    pub spawn_stagger_ms: u32,
    pub spawn_edge_margin: f32,

    // ===== pools =====
    pub player_bullet_pool: usize,
    pub enemy_bullet_pool: usize,
    pub enemy_pool: usize,
}

impl CombatConfig {
    // ===== compile-time limits =====
    /// Maximum number of party members fielded at once.
    pub const MAX_PARTY: usize = 3;
    /// Maximum concurrent timed buffs per party member.
    pub const MAX_BUFFS: usize = 8;
    /// Number of cooldown-gated skill slots per member.
    pub const SKILL_SLOTS: usize = 2;

    pub fn new() -> Self {
        Self {
            field_width: 1200.0,
            field_height: 900.0,
            projectile_margin: 50.0,

            advantage_multiplier: 1.3,
            disadvantage_multiplier: 0.7,
            defense_curve: 200.0,
            jitter_min: 0.95,
            jitter_max: 1.05,

            break_damage_ratio: 0.1,
            breaker_break_bonus: 1.3,
            break_duration_ms: 5000,
            break_damage_bonus: 1.5,

            boss_phase_threshold: 0.5,
            boss_first_pattern_delay_ms: 2000,
            boss_pattern_interval_ms: 2000,
            boss_pattern_jitter_ms: 1000,
            boss_chase_factor: 0.5,

            enemy_first_fire_delay_ms: 1000,
            enemy_first_fire_jitter_ms: 2000,
            burst_shot_delay_ms: 100,
            contact_cooldown_ms: 500,

            ult_gauge_max: 1000,
            ult_charge_on_deal: 8,
            ult_charge_on_receive: 15,
            ult_charge_on_kill: 50,
            default_skill1_cooldown_ms: 10_000,
            default_skill2_cooldown_ms: 18_000,
            tank_shield_refill: 300,
            support_atk_buff_ratio: 0.2,
            support_buff_duration_ms: 10_000,

            dodge_cooldown_ms: 3000,
            dodge_duration_ms: 300,
            dodge_speed_factor: 3.0,

            first_wave_delay_ms: 1000,
            next_wave_delay_ms: 2000,
            area_transition_delay_ms: 2000,
            spawn_stagger_ms: 300,
            spawn_edge_margin: 100.0,

            player_bullet_pool: 200,
            enemy_bullet_pool: 300,
            enemy_pool: 30,
        }
    }

    /// Returns true if `(x, y)` lies outside the field plus projectile margin.
    pub fn is_out_of_bounds(&self, x: f32, y: f32) -> bool {
        let m = self.projectile_margin;
        x < -m || x > self.field_width + m || y < -m || y > self.field_height + m
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
