//! Projectile movement, player hits, and range expiry

use glam::Vec2;

use super::combat::hurt_player;
use super::state::{GameState, Owner, Projectile};

/// Angel shots
pub const RANGED_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
/// Boss volley
pub const BOSS_COLOR: [f32; 4] = [0.98, 0.8, 0.08, 1.0];

/// Add a projectile to the active set, returning its id
pub fn spawn_projectile(
    state: &mut GameState,
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    owner: Owner,
    color: [f32; 4],
) -> u32 {
    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        pos,
        vel,
        radius,
        owner,
        color,
    });
    id
}

/// Whether a projectile overlaps the player's hit circle
pub fn hits_player(projectile: &Projectile, player_center: Vec2, margin: f32) -> bool {
    projectile.owner == Owner::Enemy && projectile.pos.distance(player_center) < projectile.radius + margin
}

/// Projectile step: advance every projectile, consume those touching the
/// player, drop those farther than the max range from the player's x.
pub fn update_projectiles(state: &mut GameState) {
    let player_center = state.player.center();
    let player_x = state.player.pos.x;
    let margin = state.tuning.player_hit_margin;
    let max_range = state.tuning.projectile_max_range;

    let mut impacts: Vec<(Vec2, [f32; 4])> = Vec::new();
    state.projectiles.retain_mut(|p| {
        p.pos += p.vel;
        if hits_player(p, player_center, margin) {
            impacts.push((p.pos, p.color));
            return false;
        }
        (p.pos.x - player_x).abs() <= max_range
    });

    let damage = state.tuning.projectile_damage;
    let speed = state.tuning.particle_speed * 0.5;
    for (pos, color) in impacts {
        state.fx.burst(&mut state.rng, pos, color, 4, speed);
        hurt_player(state, damage);
    }
}
