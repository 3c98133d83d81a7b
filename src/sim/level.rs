//! Chapter level layout: platforms, enemy roster, boss

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyKind, EnemyState, GameState, Platform};

/// Ground plus the four floating ledges every chapter shares
pub const BASE_PLATFORMS: [Platform; 5] = [
    Platform::new(0.0, 550.0, 12000.0, 50.0),
    Platform::new(400.0, 400.0, 250.0, 20.0),
    Platform::new(800.0, 300.0, 250.0, 20.0),
    Platform::new(1300.0, 450.0, 300.0, 20.0),
    Platform::new(1800.0, 350.0, 300.0, 20.0),
];

pub const ENEMY_COUNT: usize = 12;
pub const ENEMY_START_X: f32 = 1200.0;
pub const ENEMY_SPACING: f32 = 500.0;
pub const ENEMY_Y: f32 = 400.0;
pub const ENEMY_SIZE: Vec2 = Vec2::new(45.0, 55.0);
pub const ENEMY_BASE_HP: i32 = 80;
/// Extra enemy hp per chapter index
pub const ENEMY_HP_PER_CHAPTER: i32 = 10;

pub const BOSS_X: f32 = 4800.0;
pub const BOSS_Y: f32 = 350.0;
pub const BOSS_SIZE: Vec2 = Vec2::new(140.0, 200.0);
pub const BOSS_BASE_HP: i32 = 1200;
pub const BOSS_HP_PER_CHAPTER: i32 = 300;
pub const BOSS_SPEED: f32 = 2.5;
pub const BOSS_COOLDOWN_MS: f64 = 1500.0;

/// Extra ledges per chapter, scattered between the opening area and the boss
const EXTRA_PLATFORMS_PER_CHAPTER: u32 = 2;
const MAX_EXTRA_PLATFORMS: u32 = 12;

/// Populate platforms, enemies and the boss for `state.chapter`.
/// Consumes the run RNG, so the layout is fixed by the seed.
pub fn build_level(state: &mut GameState) {
    let chapter = state.chapter;
    let scale = chapter.min(i32::MAX as u32) as i32;

    state.platforms.clear();
    state.platforms.extend_from_slice(&BASE_PLATFORMS);
    let extra = chapter.saturating_mul(EXTRA_PLATFORMS_PER_CHAPTER).min(MAX_EXTRA_PLATFORMS);
    for _ in 0..extra {
        let x = state.rng.random_range(2200.0..4400.0);
        let y = state.rng.random_range(300.0..460.0);
        let width = state.rng.random_range(180.0..320.0);
        state.platforms.push(Platform::new(x, y, width, 20.0));
    }

    state.enemies.clear();
    let enemy_hp = ENEMY_BASE_HP.saturating_add(scale.saturating_mul(ENEMY_HP_PER_CHAPTER));
    let patrol_range = state.tuning.patrol_range;
    for i in 0..ENEMY_COUNT {
        let kind = if i % 3 == 0 { EnemyKind::Ranged } else { EnemyKind::Melee };
        let x = ENEMY_START_X + ENEMY_SPACING * i as f32;
        let cooldown = state.rng.random_range(1200.0..2000.0);
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            kind,
            pos: Vec2::new(x, ENEMY_Y),
            vel: Vec2::ZERO,
            speed: if i % 2 == 0 { 3.0 } else { 2.0 },
            width: ENEMY_SIZE.x,
            height: ENEMY_SIZE.y,
            hp: enemy_hp,
            max_hp: enemy_hp,
            state: EnemyState::Patrol,
            facing: -1.0,
            last_attack_ms: None,
            attack_cooldown_ms: cooldown,
            patrol_origin: x,
            patrol_range,
            hit_flash_ticks: 0,
            attack_ticks: 0,
            corpse_ticks: 0,
        });
    }

    let boss_hp = BOSS_BASE_HP.saturating_add(scale.saturating_mul(BOSS_HP_PER_CHAPTER));
    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        kind: EnemyKind::Boss,
        pos: Vec2::new(BOSS_X, BOSS_Y),
        vel: Vec2::ZERO,
        speed: BOSS_SPEED,
        width: BOSS_SIZE.x,
        height: BOSS_SIZE.y,
        hp: boss_hp,
        max_hp: boss_hp,
        state: EnemyState::Patrol,
        facing: -1.0,
        last_attack_ms: None,
        attack_cooldown_ms: BOSS_COOLDOWN_MS,
        patrol_origin: BOSS_X,
        patrol_range: 0.0,
        hit_flash_ticks: 0,
        attack_ticks: 0,
        corpse_ticks: 0,
    });

    log::debug!(
        "Built chapter {} level: {} platforms, {} enemies",
        chapter,
        state.platforms.len(),
        state.enemies.len()
    );
}
