//! Data-driven game balance
//!
//! Every numeric constant the simulation reads lives here. Distances are in
//! logical canvas units, velocities in units per tick, timers in ticks unless
//! the field name says `_ms`. Partial JSON overrides are merged onto the
//! defaults.

use serde::{Deserialize, Serialize};

/// Full tuning table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player movement ===
    pub gravity: f32,
    /// Horizontal velocity multiplier applied each tick with no directional intent
    pub friction: f32,
    /// Fraction of max speed added per tick while a direction is held
    pub acceleration: f32,
    /// Below this horizontal speed, friction snaps velocity to zero
    pub stop_threshold: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,

    // === Player combat ===
    pub attack_cooldown_ms: f64,
    /// Active hit window and swing visual
    pub attack_window_ms: f64,
    pub hitbox_width: f32,
    /// Extra height above and below the player body
    pub hitbox_vertical_pad: f32,
    /// Upper bound (inclusive) of the random bonus damage per hit
    pub attack_bonus_max: i32,
    pub knockback: f32,
    /// Knockback multiplier applied to bosses
    pub boss_knockback_scale: f32,
    pub hit_flash_ticks: u32,
    pub invulnerability_ticks: u32,
    pub enemy_reward: u32,
    pub boss_reward: u32,

    // === Enemy AI ===
    pub aggro_radius: f32,
    pub aggro_band: f32,
    /// Aggroed regular enemies lose interest beyond this distance
    pub leash_radius: f32,
    pub patrol_range: f32,
    pub melee_strike_range: f32,
    pub contact_range_x: f32,
    pub contact_range_y: f32,
    pub melee_strike_damage: i32,
    pub contact_damage: i32,
    pub boss_contact_damage: i32,
    pub enemy_attack_ticks: u32,
    pub ranged_projectile_speed: f32,
    pub ranged_projectile_radius: f32,
    /// Vertical aim: vy = (player.y - enemy.y) / divisor
    pub ranged_aim_divisor: f32,
    pub boss_aggro_radius: f32,
    pub boss_aggro_band: f32,
    pub boss_min_approach: f32,
    pub boss_volley_count: u32,
    pub boss_projectile_speed: f32,
    pub boss_volley_spread: f32,
    pub boss_projectile_radius: f32,
    /// Ticks a dead enemy stays in the active set before removal
    pub corpse_ticks: u32,

    // === Projectiles ===
    pub projectile_damage: i32,
    pub player_hit_margin: f32,
    pub projectile_max_range: f32,

    // === FX ===
    pub burst_count: usize,
    /// Max per-axis particle speed
    pub particle_speed: f32,
    pub particle_decay: f32,
    pub damage_text_rise: f32,
    pub damage_text_decay: f32,

    // === Progress ===
    pub checkpoint_bucket: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            friction: 0.8,
            acceleration: 0.1,
            stop_threshold: 0.1,
            player_width: 40.0,
            player_height: 60.0,
            spawn_x: 100.0,
            spawn_y: 300.0,

            attack_cooldown_ms: 300.0,
            attack_window_ms: 150.0,
            hitbox_width: 100.0,
            hitbox_vertical_pad: 20.0,
            attack_bonus_max: 0,
            knockback: 8.0,
            boss_knockback_scale: 0.25,
            hit_flash_ticks: 10,
            invulnerability_ticks: 60,
            enemy_reward: 50,
            boss_reward: 1000,

            aggro_radius: 600.0,
            aggro_band: 250.0,
            leash_radius: 900.0,
            patrol_range: 150.0,
            melee_strike_range: 60.0,
            contact_range_x: 50.0,
            contact_range_y: 60.0,
            melee_strike_damage: 20,
            contact_damage: 15,
            boss_contact_damage: 25,
            enemy_attack_ticks: 20,
            ranged_projectile_speed: 9.0,
            ranged_projectile_radius: 8.0,
            ranged_aim_divisor: 40.0,
            boss_aggro_radius: 1000.0,
            boss_aggro_band: 600.0,
            boss_min_approach: 120.0,
            boss_volley_count: 5,
            boss_projectile_speed: 8.0,
            boss_volley_spread: 2.5,
            boss_projectile_radius: 15.0,
            corpse_ticks: 30,

            projectile_damage: 20,
            player_hit_margin: 20.0,
            projectile_max_range: 1500.0,

            burst_count: 8,
            particle_speed: 6.0,
            particle_decay: 0.02,
            damage_text_rise: 0.6,
            damage_text_decay: 0.02,

            checkpoint_bucket: 3000.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Attack window in whole ticks
    pub fn attack_window_ticks(&self) -> u32 {
        crate::ms_to_ticks(self.attack_window_ms)
    }
}
