//! Draw-list builder
//!
//! Turns a read-only view of the simulation into triangles in logical canvas
//! units (1200x600, y down). Pure: no GPU types, so it runs in unit tests.

use glam::Vec2;

use super::shapes::{bar, circle, rect, rect_outline};
use super::vertex::{Vertex, colors, fade};
use crate::camera::Camera;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::roster::Character;
use crate::settings::Settings;
use crate::sim::collision::Rect;
use crate::sim::combat::hitbox;
use crate::sim::{Enemy, EnemyKind, GamePhase, GameState};

const PARTICLE_SIZE: f32 = 4.0;
/// Damage callouts are drawn as pips, one segment per character
const CALLOUT_CHAR_WIDTH: f32 = 6.0;
const ENEMY_BAR_HEIGHT: f32 = 5.0;
/// Invulnerability blink half-period in ticks
const BLINK_TICKS: u32 = 4;

const PLAYER_BAR: Rect = Rect::new(20.0, 20.0, 240.0, 14.0);
const BOSS_BAR: Rect = Rect::new(300.0, 565.0, 600.0, 12.0);

/// Per-run presentation choices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    pub player_color: [f32; 4],
    /// Hit flash and invulnerability blink
    pub flicker: bool,
    pub circle_segments: u32,
}

impl SceneOptions {
    pub fn new(settings: &Settings, character: &Character) -> Self {
        Self {
            player_color: character.color,
            flicker: settings.effective_flicker(),
            circle_segments: settings.quality.circle_segments(),
        }
    }
}

/// Build the full frame
pub fn build_scene(state: &GameState, camera: &Camera, options: &SceneOptions) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(2048);

    rect(&mut out, 0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT, colors::BACKGROUND);
    rect(&mut out, 0.0, 0.0, CANVAS_WIDTH, 160.0, fade(colors::SKY_GLOW, 0.25));

    for platform in &state.platforms {
        if !camera.is_visible(platform.x, platform.width) {
            continue;
        }
        let p = camera.world_to_canvas(Vec2::new(platform.x, platform.y));
        rect(&mut out, p.x, p.y, platform.width, platform.height, colors::PLATFORM);
        rect(&mut out, p.x, p.y, platform.width, 3.0, colors::PLATFORM_EDGE);
    }

    for enemy in &state.enemies {
        if camera.is_visible(enemy.pos.x, enemy.width) {
            draw_enemy(&mut out, enemy, camera, options, state.tuning.corpse_ticks);
        }
    }

    for projectile in &state.projectiles {
        let c = camera.world_to_canvas(projectile.pos);
        circle(&mut out, c, projectile.radius, projectile.color, options.circle_segments);
    }

    draw_player(&mut out, state, camera, options);

    for particle in &state.fx.particles {
        let c = camera.world_to_canvas(particle.pos);
        let half = PARTICLE_SIZE * 0.5;
        rect(&mut out, c.x - half, c.y - half, PARTICLE_SIZE, PARTICLE_SIZE, fade(particle.color, particle.life));
    }

    for text in &state.fx.texts {
        let c = camera.world_to_canvas(text.pos);
        let width = CALLOUT_CHAR_WIDTH * text.value.chars().count() as f32;
        rect(&mut out, c.x - width * 0.5, c.y - 4.0, width, 4.0, fade(text.color, text.life));
    }

    draw_hud(&mut out, state);

    out
}

fn draw_enemy(out: &mut Vec<Vertex>, enemy: &Enemy, camera: &Camera, options: &SceneOptions, corpse_ticks: u32) {
    let p = camera.world_to_canvas(enemy.pos);

    if enemy.is_dead() {
        let linger = if corpse_ticks > 0 {
            enemy.corpse_ticks as f32 / corpse_ticks as f32
        } else {
            0.0
        };
        rect(out, p.x, p.y, enemy.width, enemy.height, fade(colors::CORPSE, linger));
        return;
    }

    let color = if options.flicker && enemy.hit_flash_ticks > 0 {
        colors::HIT_FLASH
    } else {
        match enemy.kind {
            EnemyKind::Melee => colors::MELEE,
            EnemyKind::Ranged => colors::RANGED,
            EnemyKind::Boss => colors::BOSS,
        }
    };
    rect(out, p.x, p.y, enemy.width, enemy.height, color);

    if !enemy.is_boss() {
        let area = Rect::new(p.x, p.y - 10.0, enemy.width, ENEMY_BAR_HEIGHT);
        bar(out, area, enemy.hp_fraction(), colors::BAR_BACK, colors::BAR_ENEMY);
    }
}

fn draw_player(out: &mut Vec<Vertex>, state: &GameState, camera: &Camera, options: &SceneOptions) {
    let player = &state.player;

    if player.is_attacking() {
        let reach = hitbox(player, &state.tuning);
        let p = camera.world_to_canvas(Vec2::new(reach.x, reach.y));
        rect(out, p.x, p.y, reach.w, reach.h, colors::SWING);
        rect_outline(out, p.x, p.y, reach.w, reach.h, 2.0, colors::HIT_FLASH);
    }

    let blink_off = options.flicker
        && player.invulnerable_ticks > 0
        && (player.invulnerable_ticks / BLINK_TICKS) % 2 == 1;
    if !blink_off {
        let p = camera.world_to_canvas(player.pos);
        rect(out, p.x, p.y, player.width, player.height, options.player_color);
    }
}

fn draw_hud(out: &mut Vec<Vertex>, state: &GameState) {
    let player = &state.player;
    let fraction = if player.max_hp > 0 {
        player.hp as f32 / player.max_hp as f32
    } else {
        0.0
    };
    bar(out, PLAYER_BAR, fraction, colors::BAR_BACK, colors::BAR_PLAYER);

    if state.phase == GamePhase::BossFight {
        if let Some(boss) = state.boss() {
            bar(out, BOSS_BAR, boss.hp_fraction(), colors::BAR_BACK, colors::BAR_BOSS);
        }
    }
}
